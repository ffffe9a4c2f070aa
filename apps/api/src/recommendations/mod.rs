//! Recommendation Store — persists ranking runs and owns the
//! viewed/applied lifecycle. The table is an append-only history log:
//! every run inserts fresh rows, and repeat (user, job) pairs across runs
//! are intentional.

pub mod engine;
pub mod handlers;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::recommendation::RecommendationRow;
use crate::ranking::ScoredJob;

/// Persists one ranking run for a user. All rows commit in a single
/// transaction; a partial run must never become visible, or "what was
/// shown" and "what is recorded" drift apart.
pub async fn persist_ranking(
    pool: &PgPool,
    user_id: Uuid,
    ranked: &[ScoredJob],
) -> Result<Vec<RecommendationRow>, AppError> {
    let mut tx = pool.begin().await?;

    let mut rows = Vec::with_capacity(ranked.len());
    for scored in ranked {
        let row: RecommendationRow = sqlx::query_as(
            "INSERT INTO recommendations (user_id, job_id, score) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(user_id)
        .bind(scored.job.id)
        .bind(scored.score)
        .fetch_one(&mut *tx)
        .await?;
        rows.push(row);
    }

    tx.commit().await?;

    info!("Persisted {} recommendations for user {user_id}", rows.len());
    Ok(rows)
}

/// Marks a recommendation as viewed. Idempotent: marking an already-viewed
/// row is a no-op success. `NotFound` when the id does not exist or
/// belongs to another user — the two cases are indistinguishable to the
/// caller.
pub async fn mark_viewed(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
) -> Result<RecommendationRow, AppError> {
    sqlx::query_as::<_, RecommendationRow>(
        "UPDATE recommendations SET viewed = TRUE WHERE id = $1 AND user_id = $2 RETURNING *",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Recommendation {id} not found")))
}

/// Marks a recommendation as applied. Same contract as `mark_viewed`.
pub async fn mark_applied(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
) -> Result<RecommendationRow, AppError> {
    sqlx::query_as::<_, RecommendationRow>(
        "UPDATE recommendations SET applied = TRUE WHERE id = $1 AND user_id = $2 RETURNING *",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Recommendation {id} not found")))
}

/// One row of a user's recommendation history, joined with the job title.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub job_id: Uuid,
    pub job_title: String,
    pub score: f32,
    pub viewed: bool,
    pub applied: bool,
    pub created_at: DateTime<Utc>,
}

/// Returns the user's recommendations newest-first. Empty vec, never an
/// error, when the user has none.
pub async fn history(
    pool: &PgPool,
    user_id: Uuid,
    offset: i64,
    limit: i64,
) -> Result<Vec<HistoryEntry>, AppError> {
    Ok(sqlx::query_as::<_, HistoryEntry>(
        r#"
        SELECT r.id, r.job_id, j.title AS job_title, r.score, r.viewed, r.applied, r.created_at
        FROM recommendations r
        JOIN jobs j ON j.id = r.job_id
        WHERE r.user_id = $1
        ORDER BY r.created_at DESC
        OFFSET $2 LIMIT $3
        "#,
    )
    .bind(user_id)
    .bind(offset)
    .bind(limit)
    .fetch_all(pool)
    .await?)
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationStats {
    pub total: i64,
    pub viewed_count: i64,
    pub applied_count: i64,
    pub view_rate: f64,
    pub apply_rate: f64,
}

impl RecommendationStats {
    /// Rates are percentages of total; zero recommendations means zero
    /// rates, not a division error.
    pub fn from_counts(total: i64, viewed_count: i64, applied_count: i64) -> Self {
        let rate = |count: i64| {
            if total > 0 {
                count as f64 / total as f64 * 100.0
            } else {
                0.0
            }
        };
        Self {
            total,
            viewed_count,
            applied_count,
            view_rate: rate(viewed_count),
            apply_rate: rate(applied_count),
        }
    }
}

#[derive(FromRow)]
struct StatCounts {
    total: i64,
    viewed_count: i64,
    applied_count: i64,
}

pub async fn stats(pool: &PgPool, user_id: Uuid) -> Result<RecommendationStats, AppError> {
    let counts: StatCounts = sqlx::query_as(
        r#"
        SELECT COUNT(*) AS total,
               COUNT(*) FILTER (WHERE viewed) AS viewed_count,
               COUNT(*) FILTER (WHERE applied) AS applied_count
        FROM recommendations
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(RecommendationStats::from_counts(
        counts.total,
        counts.viewed_count,
        counts.applied_count,
    ))
}
