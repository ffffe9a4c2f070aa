mod config;
mod db;
mod embedding;
mod errors;
mod jobs;
mod jobsearch;
mod models;
mod profile;
mod ranking;
mod recommendations;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::embedding::HttpEmbedder;
use crate::jobsearch::provider::ProviderClient;
use crate::recommendations::engine::RecommendationEngine;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting job recommendation API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize embedding backend and engine
    let embedder = Arc::new(HttpEmbedder::new(
        config.embedding_api_url.clone(),
        config.embedding_api_key.clone(),
    ));
    let engine = RecommendationEngine::new(embedder);
    info!("Recommendation engine initialized (model: {})", embedding::MODEL);

    // Initialize job-search provider client
    let provider = ProviderClient::new(
        config.provider_api_url.clone(),
        config.provider_api_key.clone(),
    );
    info!("Job provider client initialized");

    // Build app state
    let state = AppState {
        db,
        engine,
        provider,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
