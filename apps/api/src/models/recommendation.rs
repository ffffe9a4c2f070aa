use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One scored (user, job) link from a single ranking run.
/// `score` is immutable after insert; only `viewed`/`applied` may
/// transition, and only from false to true.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RecommendationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_id: Uuid,
    pub score: f32,
    pub viewed: bool,
    pub applied: bool,
    pub created_at: DateTime<Utc>,
}
