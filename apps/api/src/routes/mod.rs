pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::jobs::handlers as job_handlers;
use crate::jobsearch::handlers as search_handlers;
use crate::recommendations::handlers as rec_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Recommendations
        .route("/api/v1/recommendations", get(rec_handlers::handle_recommend))
        .route(
            "/api/v1/recommendations/history",
            get(rec_handlers::handle_history),
        )
        .route(
            "/api/v1/recommendations/:id/viewed",
            post(rec_handlers::handle_mark_viewed),
        )
        .route(
            "/api/v1/recommendations/:id/applied",
            post(rec_handlers::handle_mark_applied),
        )
        .route(
            "/api/v1/recommendations/stats",
            get(rec_handlers::handle_stats),
        )
        // Job catalog
        .route(
            "/api/v1/jobs",
            get(job_handlers::handle_list_jobs).post(job_handlers::handle_create_job),
        )
        // Provider search & ingestion
        .route("/api/v1/jobs/search", get(search_handlers::handle_search_jobs))
        .route(
            "/api/v1/jobs/provider/:external_id",
            get(search_handlers::handle_provider_job),
        )
        .route(
            "/api/v1/jobs/:id",
            get(job_handlers::handle_get_job).patch(job_handlers::handle_update_job),
        )
        .with_state(state)
}
