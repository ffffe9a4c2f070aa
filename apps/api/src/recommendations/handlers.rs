use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::recommendation::RecommendationRow;
use crate::ranking::DEFAULT_TOP_K;
use crate::recommendations::engine::RecommendedJob;
use crate::recommendations::{self, HistoryEntry, RecommendationStats};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct RecommendQuery {
    pub user_id: Uuid,
    pub top_k: Option<usize>,
}

fn default_limit() -> i64 {
    10
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub user_id: Uuid,
    #[serde(default)]
    pub offset: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

/// GET /api/v1/recommendations
/// Runs a fresh scoring pass and returns the persisted top-K.
pub async fn handle_recommend(
    State(state): State<AppState>,
    Query(params): Query<RecommendQuery>,
) -> Result<Json<Vec<RecommendedJob>>, AppError> {
    let top_k = params.top_k.unwrap_or(DEFAULT_TOP_K);
    if top_k == 0 {
        return Err(AppError::Validation("top_k must be positive".to_string()));
    }

    let recommended = state.engine.recommend(&state.db, params.user_id, top_k).await?;
    Ok(Json(recommended))
}

/// GET /api/v1/recommendations/history
pub async fn handle_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<Vec<HistoryEntry>>, AppError> {
    let entries = recommendations::history(
        &state.db,
        params.user_id,
        params.offset.max(0),
        params.limit.clamp(1, 100),
    )
    .await?;
    Ok(Json(entries))
}

/// POST /api/v1/recommendations/:id/viewed
pub async fn handle_mark_viewed(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<RecommendationRow>, AppError> {
    let row = recommendations::mark_viewed(&state.db, id, params.user_id).await?;
    Ok(Json(row))
}

/// POST /api/v1/recommendations/:id/applied
pub async fn handle_mark_applied(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<RecommendationRow>, AppError> {
    let row = recommendations::mark_applied(&state.db, id, params.user_id).await?;
    Ok(Json(row))
}

/// GET /api/v1/recommendations/stats
pub async fn handle_stats(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<RecommendationStats>, AppError> {
    let stats = recommendations::stats(&state.db, params.user_id).await?;
    Ok(Json(stats))
}
