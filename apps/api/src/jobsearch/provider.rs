//! HTTP client for the external job-search provider.
//!
//! The provider authenticates with the API key as the basic-auth username
//! and an empty password, and returns search results as
//! `{"results": [...]}`. Records are returned raw; per-record parsing
//! happens at the ingestion boundary so one bad record cannot fail a
//! whole batch.

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::error;

use crate::errors::AppError;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Http(e) => AppError::Provider {
                status: 502,
                message: e.to_string(),
            },
            ProviderError::Api { status, message } => AppError::Provider { status, message },
        }
    }
}

/// A provider job record, validated at the ingestion boundary.
/// Identity and the two text fields are required; everything else is
/// optional and defaults to absent.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderJob {
    pub job_id: i64,
    pub job_title: String,
    pub job_description: String,
    pub employer_name: Option<String>,
    pub location_name: Option<String>,
    pub minimum_salary: Option<f64>,
    pub maximum_salary: Option<f64>,
    pub currency: Option<String>,
    pub expiration_date: Option<String>,
    #[serde(rename = "date")]
    pub date_posted: Option<String>,
    pub job_url: Option<String>,
    pub applications: Option<i32>,
    pub job_type: Option<String>,
}

/// Search filters forwarded to the provider.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchFilters {
    pub keywords: Option<String>,
    pub location: Option<String>,
    pub distance_from_location: Option<u32>,
    pub minimum_salary: Option<f64>,
    pub maximum_salary: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct ProviderClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ProviderClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            base_url,
            api_key,
        }
    }

    /// GET {base}/search — returns the raw result records.
    pub async fn search(&self, filters: &SearchFilters) -> Result<Vec<Value>, ProviderError> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(keywords) = &filters.keywords {
            params.push(("keywords", keywords.clone()));
        }
        if let Some(location) = &filters.location {
            params.push(("locationName", location.clone()));
        }
        if let Some(distance) = filters.distance_from_location {
            params.push(("distanceFromLocation", distance.to_string()));
        }
        if let Some(min) = filters.minimum_salary {
            params.push(("minimumSalary", min.to_string()));
        }
        if let Some(max) = filters.maximum_salary {
            params.push(("maximumSalary", max.to_string()));
        }

        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .basic_auth(&self.api_key, Some(""))
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Provider search returned {status}: {body}");
            let message = serde_json::from_str::<ProviderErrorBody>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: SearchResponse = response.json().await?;
        Ok(body.results)
    }

    /// GET {base}/jobs/{id} — returns the raw detail record.
    pub async fn job_details(&self, external_job_id: i64) -> Result<Value, ProviderError> {
        let response = self
            .client
            .get(format!("{}/jobs/{external_job_id}", self.base_url))
            .basic_auth(&self.api_key, Some(""))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Provider job details returned {status}: {body}");
            let message = serde_json::from_str::<ProviderErrorBody>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_provider_job_deserializes_full_record() {
        let record = json!({
            "jobId": 501,
            "jobTitle": "Backend Engineer",
            "jobDescription": "Build services.",
            "employerName": "Acme",
            "locationName": "London",
            "minimumSalary": 50000.0,
            "maximumSalary": 70000.0,
            "currency": "GBP",
            "expirationDate": "01/09/2025",
            "date": "2025-08-01",
            "jobUrl": "https://example.com/jobs/501",
            "applications": 12,
            "jobType": "Permanent"
        });
        let job: ProviderJob = serde_json::from_value(record).unwrap();
        assert_eq!(job.job_id, 501);
        assert_eq!(job.job_title, "Backend Engineer");
        assert_eq!(job.employer_name.as_deref(), Some("Acme"));
        assert_eq!(job.date_posted.as_deref(), Some("2025-08-01"));
    }

    #[test]
    fn test_provider_job_optional_fields_default_to_absent() {
        let record = json!({
            "jobId": 502,
            "jobTitle": "Data Analyst",
            "jobDescription": "Analyze data."
        });
        let job: ProviderJob = serde_json::from_value(record).unwrap();
        assert!(job.employer_name.is_none());
        assert!(job.minimum_salary.is_none());
        assert!(job.expiration_date.is_none());
        assert!(job.applications.is_none());
    }

    #[test]
    fn test_provider_job_missing_required_field_is_error() {
        let record = json!({
            "jobId": 503,
            "jobDescription": "No title here."
        });
        assert!(serde_json::from_value::<ProviderJob>(record).is_err());
    }
}
