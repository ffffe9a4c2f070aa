use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::{self, JobUpdate, NewJob};
use crate::models::job::JobRow;
use crate::state::AppState;

fn default_limit() -> i64 {
    10
}

#[derive(Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub offset: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

#[derive(Deserialize)]
pub struct CreateJobRequest {
    pub title: String,
    pub description: String,
    pub employer_name: Option<String>,
    pub location_name: Option<String>,
    pub minimum_salary: Option<f64>,
    pub maximum_salary: Option<f64>,
    pub currency: Option<String>,
    pub job_url: Option<String>,
    pub job_type: Option<String>,
    pub expiration_date: Option<DateTime<Utc>>,
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<JobRow>>, AppError> {
    let jobs = jobs::list_jobs(&state.db, page.offset.max(0), page.limit.clamp(1, 100)).await?;
    Ok(Json(jobs))
}

/// POST /api/v1/jobs
/// Admin creation of a manual posting; `external_job_id` stays NULL so
/// the row can never collide with provider ingestion.
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(req): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobRow>), AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::Validation("title must not be empty".to_string()));
    }
    if req.description.trim().is_empty() {
        return Err(AppError::Validation(
            "description must not be empty".to_string(),
        ));
    }

    let new_job = NewJob {
        title: req.title,
        description: req.description,
        employer_name: req.employer_name,
        location_name: req.location_name,
        minimum_salary: req.minimum_salary,
        maximum_salary: req.maximum_salary,
        currency: req.currency,
        job_url: req.job_url,
        applications: None,
        job_type: req.job_type,
        external_job_id: None,
        expiration_date: req.expiration_date,
    };

    let job = jobs::insert_job(&state.db, &new_job).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobRow>, AppError> {
    let job = jobs::find_job(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    Ok(Json(job))
}

/// PATCH /api/v1/jobs/:id
pub async fn handle_update_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<JobUpdate>,
) -> Result<Json<JobRow>, AppError> {
    if update.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(AppError::Validation("title must not be empty".to_string()));
    }

    let job = jobs::update_job(&state.db, id, &update)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    Ok(Json(job))
}
