//! Recommendation Engine — one scoring run end to end: profile text →
//! user vector → job vectors → ranked top-K → persisted rows.

use std::sync::Arc;

use serde::Serialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::embedding::Embedder;
use crate::errors::AppError;
use crate::jobs::all_jobs;
use crate::models::job::JobRow;
use crate::profile::build_profile;
use crate::ranking::{rank, ScoredJob};
use crate::recommendations::persist_ranking;

/// What a ranking run returns to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendedJob {
    pub recommendation_id: Uuid,
    pub job_id: Uuid,
    pub title: String,
    pub description: String,
    pub score: f32,
}

/// Explicitly constructed engine owning its embedding-backend handle.
/// Injected through `AppState`; tests construct it with a stub embedder.
#[derive(Clone)]
pub struct RecommendationEngine {
    embedder: Arc<dyn Embedder>,
}

impl RecommendationEngine {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    /// Runs one scoring pass for a user and persists the top-K result.
    ///
    /// A user with no résumé (or an empty one) gets an empty set, not an
    /// error. All embedding calls complete before the persistence
    /// transaction opens, so a slow backend never holds a transaction.
    pub async fn recommend(
        &self,
        pool: &PgPool,
        user_id: Uuid,
        top_k: usize,
    ) -> Result<Vec<RecommendedJob>, AppError> {
        let profile = build_profile(pool, user_id).await?;
        if profile.is_empty() {
            info!("User {user_id} has no usable resume, returning no recommendations");
            return Ok(vec![]);
        }

        let user_vector = self.embedder.embed(&profile).await?;

        let jobs = all_jobs(pool).await?;
        let mut job_pool = Vec::with_capacity(jobs.len());
        for job in jobs {
            let vector = self.embedder.embed(&job_embedding_text(&job)).await?;
            job_pool.push((job, vector));
        }

        let ranked = rank(&user_vector, job_pool, top_k);
        let rows = persist_ranking(pool, user_id, &ranked).await?;

        Ok(rows
            .into_iter()
            .zip(ranked)
            .map(|(row, scored)| RecommendedJob {
                recommendation_id: row.id,
                job_id: scored.job.id,
                title: scored.job.title,
                description: scored.job.description,
                score: scored.score,
            })
            .collect())
    }
}

/// The text a job is embedded from. Title leads so short postings still
/// carry their strongest signal.
fn job_embedding_text(job: &JobRow) -> String {
    format!("{} {}", job.title, job.description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_job_embedding_text_is_title_then_description() {
        let job = JobRow {
            id: Uuid::new_v4(),
            title: "Backend Engineer".to_string(),
            description: "Build services in Rust.".to_string(),
            employer_name: None,
            location_name: None,
            minimum_salary: None,
            maximum_salary: None,
            currency: None,
            job_url: None,
            applications: None,
            job_type: None,
            external_job_id: None,
            created_at: Utc::now(),
            expiration_date: None,
        };
        assert_eq!(
            job_embedding_text(&job),
            "Backend Engineer Build services in Rust."
        );
    }
}
