use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A job posting. `external_job_id` is the provider's identity and is
/// unique when present; manually created postings carry `None`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub employer_name: Option<String>,
    pub location_name: Option<String>,
    pub minimum_salary: Option<f64>,
    pub maximum_salary: Option<f64>,
    pub currency: Option<String>,
    pub job_url: Option<String>,
    pub applications: Option<i32>,
    pub job_type: Option<String>,
    pub external_job_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub expiration_date: Option<DateTime<Utc>>,
}
