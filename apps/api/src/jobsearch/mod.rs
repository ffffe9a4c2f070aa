//! Job Ingestion — normalizes provider records into Job rows with an
//! at-most-one-record-per-external-id guarantee. Re-ingesting a known id
//! returns the stored row unchanged; locally edited fields are never
//! overwritten by the provider.

pub mod handlers;
pub mod provider;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::PgPool;
use tracing::warn;

use crate::errors::AppError;
use crate::jobs::{find_by_external_id, insert_job, NewJob};
use crate::jobsearch::provider::ProviderJob;
use crate::models::job::JobRow;

/// A provider record that failed validation and was skipped.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedRecord {
    pub external_job_id: Option<i64>,
    pub reason: String,
}

/// Outcome of one ingestion batch: what was stored (or already known) and
/// what was skipped, so callers observe partial failure instead of a log
/// line.
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub jobs: Vec<JobRow>,
    pub skipped: Vec<SkippedRecord>,
}

/// Parses date strings the provider emits: ISO-8601 first, then
/// `DD/MM/YYYY`. Unparseable dates resolve to `None`, never an error that
/// aborts ingestion.
pub fn parse_provider_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(Utc.from_utc_datetime(&dt));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| Utc.from_utc_datetime(&dt));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%d/%m/%Y") {
        return date.and_hms_opt(0, 0, 0).map(|dt| Utc.from_utc_datetime(&dt));
    }
    None
}

/// Maps a validated provider record onto the insert field set, copying
/// provider fields verbatim and parsing dates defensively.
fn to_new_job(record: &ProviderJob) -> NewJob {
    NewJob {
        title: record.job_title.clone(),
        description: record.job_description.clone(),
        employer_name: record.employer_name.clone(),
        location_name: record.location_name.clone(),
        minimum_salary: record.minimum_salary,
        maximum_salary: record.maximum_salary,
        currency: record.currency.clone(),
        job_url: record.job_url.clone(),
        applications: record.applications,
        job_type: record.job_type.clone(),
        external_job_id: Some(record.job_id),
        expiration_date: record.expiration_date.as_deref().and_then(parse_provider_date),
    }
}

/// Idempotently ingests one provider record.
///
/// Lookup by `external_job_id` wins over insertion, and a unique-violation
/// from a concurrent racer is resolved by re-reading the winner's row.
pub async fn ingest_job(pool: &PgPool, record: &ProviderJob) -> Result<JobRow, AppError> {
    if let Some(existing) = find_by_external_id(pool, record.job_id).await? {
        return Ok(existing);
    }

    let new_job = to_new_job(record);
    match insert_job(pool, &new_job).await {
        Ok(job) => Ok(job),
        Err(e) if is_unique_violation(&e) => {
            // Lost the insert race; the winner's row is visible now.
            find_by_external_id(pool, record.job_id)
                .await?
                .ok_or(AppError::Database(e))
        }
        Err(e) => Err(AppError::Database(e)),
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}

/// Ingests a batch of raw provider records. Records that fail validation
/// are skipped with a logged warning and reported; storage errors still
/// abort, since they indicate a failure larger than one bad record.
pub async fn ingest_batch(pool: &PgPool, records: &[Value]) -> Result<IngestReport, AppError> {
    let mut jobs = Vec::new();
    let mut skipped = Vec::new();

    for raw in records {
        match serde_json::from_value::<ProviderJob>(raw.clone()) {
            Ok(record) => jobs.push(ingest_job(pool, &record).await?),
            Err(e) => {
                let external_job_id = raw.get("jobId").and_then(|v| v.as_i64());
                warn!("Skipping malformed provider record {external_job_id:?}: {e}");
                skipped.push(SkippedRecord {
                    external_job_id,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(IngestReport { jobs, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_record() -> ProviderJob {
        serde_json::from_value(json!({
            "jobId": 501,
            "jobTitle": "Backend Engineer",
            "jobDescription": "Build services.",
            "employerName": "Acme",
            "locationName": "London",
            "minimumSalary": 50000.0,
            "maximumSalary": 70000.0,
            "currency": "GBP",
            "expirationDate": "30/09/2025",
            "date": "2025-08-01",
            "jobUrl": "https://example.com/jobs/501",
            "applications": 12,
            "jobType": "Permanent"
        }))
        .unwrap()
    }

    #[test]
    fn test_parse_date_rfc3339() {
        let parsed = parse_provider_date("2025-08-01T09:30:00Z").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2025-08-01T09:30:00+00:00");
    }

    #[test]
    fn test_parse_date_iso_without_timezone() {
        let parsed = parse_provider_date("2025-08-01T09:30:00").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2025-08-01T09:30:00+00:00");
    }

    #[test]
    fn test_parse_date_iso_date_only() {
        let parsed = parse_provider_date("2025-08-01").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2025-08-01T00:00:00+00:00");
    }

    #[test]
    fn test_parse_date_day_month_year() {
        let parsed = parse_provider_date("01/08/2025").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2025-08-01T00:00:00+00:00");
    }

    #[test]
    fn test_parse_date_garbage_is_none() {
        assert!(parse_provider_date("next Tuesday").is_none());
        assert!(parse_provider_date("13/45/2025").is_none());
        assert!(parse_provider_date("").is_none());
    }

    #[test]
    fn test_to_new_job_copies_provider_fields_verbatim() {
        let record = make_record();
        let new_job = to_new_job(&record);
        assert_eq!(new_job.title, "Backend Engineer");
        assert_eq!(new_job.description, "Build services.");
        assert_eq!(new_job.employer_name.as_deref(), Some("Acme"));
        assert_eq!(new_job.external_job_id, Some(501));
        assert_eq!(new_job.applications, Some(12));
    }

    #[test]
    fn test_to_new_job_parses_expiration_date() {
        let record = make_record();
        let new_job = to_new_job(&record);
        let expiration = new_job.expiration_date.unwrap();
        assert_eq!(expiration.to_rfc3339(), "2025-09-30T00:00:00+00:00");
    }

    #[test]
    fn test_to_new_job_unparseable_date_becomes_none() {
        let mut record = make_record();
        record.expiration_date = Some("whenever".to_string());
        assert!(to_new_job(&record).expiration_date.is_none());
    }
}
