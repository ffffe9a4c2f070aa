use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A parsed résumé as stored by the upload/extraction collaborator.
/// `parsed_data` holds the structured sections (skills, experience,
/// education); this service only ever reads the newest row per user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub filename: String,
    pub parsed_data: Value,
    pub created_at: DateTime<Utc>,
}
