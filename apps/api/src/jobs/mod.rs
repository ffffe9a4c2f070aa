//! Job catalog — storage queries and the admin create/update surface.
//! Jobs enter the pool here (admin action) or through `jobsearch`
//! ingestion; the ranker only ever reads.

pub mod handlers;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::job::JobRow;

/// Field set for inserting a job, shared by admin creation and provider
/// ingestion.
#[derive(Debug, Clone)]
pub struct NewJob {
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
    pub expiration_date: Option<DateTime<Utc>>,
}

/// Returns the full job pool in a stable order. The ranker relies on this
/// order for deterministic tie-breaking.
pub async fn all_jobs(pool: &PgPool) -> Result<Vec<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>("SELECT * FROM jobs ORDER BY created_at ASC, id ASC")
        .fetch_all(pool)
        .await
}

pub async fn list_jobs(
    pool: &PgPool,
    offset: i64,
    limit: i64,
) -> Result<Vec<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>(
        "SELECT * FROM jobs ORDER BY created_at ASC, id ASC OFFSET $1 LIMIT $2",
    )
    .bind(offset)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn find_job(pool: &PgPool, id: Uuid) -> Result<Option<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_external_id(
    pool: &PgPool,
    external_job_id: i64,
) -> Result<Option<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE external_job_id = $1")
        .bind(external_job_id)
        .fetch_optional(pool)
        .await
}

/// Inserts a new job. Returns the raw sqlx error so ingestion can detect
/// a unique violation on `external_job_id` and recover from the race.
pub async fn insert_job(pool: &PgPool, job: &NewJob) -> Result<JobRow, sqlx::Error> {
    sqlx::query_as::<_, JobRow>(
        r#"
        INSERT INTO jobs
            (title, description, employer_name, location_name, minimum_salary,
             maximum_salary, currency, job_url, applications, job_type,
             external_job_id, expiration_date)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING *
        "#,
    )
    .bind(&job.title)
    .bind(&job.description)
    .bind(&job.employer_name)
    .bind(&job.location_name)
    .bind(job.minimum_salary)
    .bind(job.maximum_salary)
    .bind(&job.currency)
    .bind(&job.job_url)
    .bind(job.applications)
    .bind(&job.job_type)
    .bind(job.external_job_id)
    .bind(job.expiration_date)
    .fetch_one(pool)
    .await
}

/// Partial update of display fields. `external_job_id` and timestamps are
/// immutable here; absent fields keep their current value.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct JobUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub employer_name: Option<String>,
    pub location_name: Option<String>,
    pub minimum_salary: Option<f64>,
    pub maximum_salary: Option<f64>,
    pub currency: Option<String>,
    pub job_url: Option<String>,
    pub job_type: Option<String>,
    pub expiration_date: Option<DateTime<Utc>>,
}

pub async fn update_job(
    pool: &PgPool,
    id: Uuid,
    update: &JobUpdate,
) -> Result<Option<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>(
        r#"
        UPDATE jobs SET
            title = COALESCE($2, title),
            description = COALESCE($3, description),
            employer_name = COALESCE($4, employer_name),
            location_name = COALESCE($5, location_name),
            minimum_salary = COALESCE($6, minimum_salary),
            maximum_salary = COALESCE($7, maximum_salary),
            currency = COALESCE($8, currency),
            job_url = COALESCE($9, job_url),
            job_type = COALESCE($10, job_type),
            expiration_date = COALESCE($11, expiration_date)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&update.title)
    .bind(&update.description)
    .bind(&update.employer_name)
    .bind(&update.location_name)
    .bind(update.minimum_salary)
    .bind(update.maximum_salary)
    .bind(&update.currency)
    .bind(&update.job_url)
    .bind(&update.job_type)
    .bind(update.expiration_date)
    .fetch_optional(pool)
    .await
}
