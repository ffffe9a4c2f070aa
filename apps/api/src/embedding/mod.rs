/// Embedding client — the single point of entry for all embedding calls.
///
/// ARCHITECTURAL RULE: No other module may call the embedding backend
/// directly. Every piece of text that needs a vector goes through the
/// `Embedder` trait, so tests can swap in a deterministic stub.
///
/// Model: text-embedding-3-small (hardcoded — a pinned model is what makes
/// repeated scoring runs numerically reproducible)
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// The embedding model used for all vectorization.
/// Intentionally hardcoded: mixing vectors from different models makes
/// user and job embeddings incomparable.
pub const MODEL: &str = "text-embedding-3-small";
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed embedding response: {0}")]
    Malformed(String),

    #[error("Embedding backend unreachable after {retries} retries")]
    Unreachable { retries: u32 },
}

/// Turns arbitrary text into a fixed-length dense vector.
///
/// Implementations must be deterministic for a pinned model: the same
/// input yields the same vector. An unreachable backend is an error —
/// never a zero vector, which would tie every job at the same score.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
}

/// Production embedder backed by an OpenAI-compatible `/embeddings`
/// endpoint. Retries on 429 and 5xx with exponential backoff.
#[derive(Clone)]
pub struct HttpEmbedder {
    client: Client,
    api_url: String,
    api_key: String,
}

impl HttpEmbedder {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            api_url,
            api_key,
        }
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let request_body = EmbeddingRequest {
            model: MODEL,
            input: [text],
        };

        let mut last_error: Option<EmbeddingError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Embedding call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(format!("{}/embeddings", self.api_url))
                .bearer_auth(&self.api_key)
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(EmbeddingError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Embedding API returned {}: {}", status, body);
                last_error = Some(EmbeddingError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(EmbeddingError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let json: Value = response.json().await?;
            let vector = parse_embedding_response(&json)?;

            debug!("Embedded {} chars into {} dims", text.len(), vector.len());

            return Ok(vector);
        }

        Err(last_error.unwrap_or(EmbeddingError::Unreachable {
            retries: MAX_RETRIES,
        }))
    }
}

/// Extracts the first embedding vector from a `/embeddings` response body
/// of the shape `{"data": [{"index": 0, "embedding": [..]}]}`.
fn parse_embedding_response(json: &Value) -> Result<Vec<f32>, EmbeddingError> {
    let data = json
        .get("data")
        .and_then(|v| v.as_array())
        .ok_or_else(|| EmbeddingError::Malformed("missing data array".to_string()))?;

    let item = data
        .first()
        .ok_or_else(|| EmbeddingError::Malformed("empty data array".to_string()))?;

    let embedding = item
        .get("embedding")
        .and_then(|v| v.as_array())
        .ok_or_else(|| EmbeddingError::Malformed("missing embedding array".to_string()))?;

    let mut vector = Vec::with_capacity(embedding.len());
    for value in embedding {
        let number = value
            .as_f64()
            .ok_or_else(|| EmbeddingError::Malformed("embedding value must be numeric".to_string()))?;
        vector.push(number as f32);
    }

    Ok(vector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_embedding_response_happy_path() {
        let json = json!({
            "data": [{ "index": 0, "embedding": [0.5, -1.5, 2.0] }]
        });
        let vector = parse_embedding_response(&json).unwrap();
        assert_eq!(vector, vec![0.5, -1.5, 2.0]);
    }

    #[test]
    fn test_parse_embedding_response_missing_data_is_error() {
        let json = json!({ "object": "list" });
        let err = parse_embedding_response(&json).unwrap_err();
        assert!(matches!(err, EmbeddingError::Malformed(_)));
    }

    #[test]
    fn test_parse_embedding_response_empty_data_is_error() {
        let json = json!({ "data": [] });
        let err = parse_embedding_response(&json).unwrap_err();
        assert!(matches!(err, EmbeddingError::Malformed(_)));
    }

    #[test]
    fn test_parse_embedding_response_non_numeric_value_is_error() {
        let json = json!({
            "data": [{ "index": 0, "embedding": [0.5, "oops"] }]
        });
        let err = parse_embedding_response(&json).unwrap_err();
        assert!(matches!(err, EmbeddingError::Malformed(_)));
    }
}
