use sqlx::PgPool;

use crate::jobsearch::provider::ProviderClient;
use crate::recommendations::engine::RecommendationEngine;

/// Shared application state injected into all route handlers via Axum
/// extractors. The engine owns the embedding-backend handle; nothing here
/// is process-global.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub engine: RecommendationEngine,
    pub provider: ProviderClient,
}
