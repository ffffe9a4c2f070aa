use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::jobsearch::provider::{ProviderJob, SearchFilters};
use crate::jobsearch::{ingest_batch, ingest_job, IngestReport};
use crate::models::job::JobRow;
use crate::state::AppState;

/// GET /api/v1/jobs/search
/// Queries the provider and ingests the results, growing the pool future
/// ranking runs score against. Returns the full batch report.
pub async fn handle_search_jobs(
    State(state): State<AppState>,
    Query(filters): Query<SearchFilters>,
) -> Result<Json<IngestReport>, AppError> {
    let records = state.provider.search(&filters).await?;
    info!("Provider search returned {} records", records.len());

    let report = ingest_batch(&state.db, &records).await?;
    if !report.skipped.is_empty() {
        info!(
            "Ingested {} jobs, skipped {} malformed records",
            report.jobs.len(),
            report.skipped.len()
        );
    }
    Ok(Json(report))
}

/// GET /api/v1/jobs/provider/:external_id
/// Fetches one posting from the provider and ingests it. A malformed
/// detail payload is a provider failure here — there is no batch to
/// continue.
pub async fn handle_provider_job(
    State(state): State<AppState>,
    Path(external_id): Path<i64>,
) -> Result<Json<JobRow>, AppError> {
    let raw = state.provider.job_details(external_id).await?;
    let record: ProviderJob =
        serde_json::from_value(raw).map_err(|e| AppError::Provider {
            status: 502,
            message: format!("Malformed provider record: {e}"),
        })?;

    let job = ingest_job(&state.db, &record).await?;
    Ok(Json(job))
}
