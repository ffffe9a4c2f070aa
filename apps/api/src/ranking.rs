//! Similarity Ranker — scores a user vector against the job pool and keeps
//! the top K. Every run rescans the full pool; there is no incremental
//! index, which caps this at pool sizes where a rescan per request is
//! cheap.

use serde::Serialize;

use crate::models::job::JobRow;

/// Default number of recommendations kept per scoring run.
pub const DEFAULT_TOP_K: usize = 5;

/// One ranked job with its similarity score.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredJob {
    pub job: JobRow,
    pub score: f32,
}

/// Cosine similarity between two vectors, in [-1, 1].
///
/// Returns `None` when the vectors are not comparable: mismatched
/// dimensions or a zero norm (an empty job description can embed to a
/// degenerate vector; similarity is undefined there, not zero).
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }

    let mut dot = 0.0_f32;
    let mut norm_a = 0.0_f32;
    let mut norm_b = 0.0_f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }

    Some(dot / (norm_a.sqrt() * norm_b.sqrt()))
}

/// Ranks the job pool against the user vector, descending by score,
/// truncated to `top_k`.
///
/// Jobs with a degenerate vector are excluded rather than given a
/// fabricated score. Ties keep the pool's fetch order (stable sort), so
/// repeated runs over unchanged data return identical results.
pub fn rank(user_vector: &[f32], job_pool: Vec<(JobRow, Vec<f32>)>, top_k: usize) -> Vec<ScoredJob> {
    let mut scored: Vec<ScoredJob> = job_pool
        .into_iter()
        .filter_map(|(job, vector)| {
            cosine_similarity(user_vector, &vector).map(|score| ScoredJob { job, score })
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(top_k);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn make_job(title: &str) -> JobRow {
        JobRow {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: format!("{title} description"),
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
        }
    }

    /// Unit vector at `angle` radians from the x axis, so its cosine
    /// similarity against [1, 0] is exactly cos(angle).
    fn unit_at(cos: f32) -> Vec<f32> {
        vec![cos, (1.0 - cos * cos).sqrt()]
    }

    #[test]
    fn test_cosine_identical_vectors_is_one() {
        let v = vec![1.0, 2.0, 3.0];
        let score = cosine_similarity(&v, &v).unwrap();
        assert!((score - 1.0).abs() < 1e-6, "Score was {score}");
    }

    #[test]
    fn test_cosine_orthogonal_vectors_is_zero() {
        let score = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap();
        assert!(score.abs() < 1e-6);
    }

    #[test]
    fn test_cosine_opposite_vectors_is_minus_one() {
        let score = cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]).unwrap();
        assert!((score + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_zero_norm_is_undefined() {
        assert!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]).is_none());
        assert!(cosine_similarity(&[1.0, 1.0], &[0.0, 0.0]).is_none());
    }

    #[test]
    fn test_cosine_mismatched_dimensions_is_undefined() {
        assert!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]).is_none());
    }

    #[test]
    fn test_rank_descending_with_no_duplicates() {
        let user = vec![1.0, 0.0];
        let pool = vec![
            (make_job("low"), unit_at(0.2)),
            (make_job("high"), unit_at(0.9)),
            (make_job("mid"), unit_at(0.5)),
        ];
        let ranked = rank(&user, pool, 10);
        assert_eq!(ranked.len(), 3);
        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        let ids: Vec<_> = ranked.iter().map(|s| s.job.id).collect();
        let mut deduped = ids.clone();
        deduped.dedup();
        assert_eq!(ids, deduped);
        assert_eq!(ranked[0].job.title, "high");
    }

    #[test]
    fn test_rank_ties_keep_fetch_order() {
        let user = vec![1.0, 0.0];
        let pool = vec![
            (make_job("first"), unit_at(0.5)),
            (make_job("second"), unit_at(0.5)),
            (make_job("third"), unit_at(0.5)),
        ];
        let ranked = rank(&user, pool, 10);
        let titles: Vec<_> = ranked.iter().map(|s| s.job.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_rank_truncates_to_top_k() {
        let user = vec![1.0, 0.0];
        let pool: Vec<_> = (0..8)
            .map(|i| (make_job(&format!("job{i}")), unit_at(0.1 * i as f32)))
            .collect();
        assert_eq!(rank(&user, pool, 3).len(), 3);
    }

    #[test]
    fn test_rank_returns_whole_pool_when_smaller_than_top_k() {
        let user = vec![1.0, 0.0];
        let pool = vec![(make_job("only"), unit_at(0.7))];
        assert_eq!(rank(&user, pool, 5).len(), 1);
    }

    #[test]
    fn test_rank_excludes_degenerate_vectors() {
        let user = vec![1.0, 0.0];
        let pool = vec![
            (make_job("real"), unit_at(0.7)),
            (make_job("degenerate"), vec![0.0, 0.0]),
        ];
        let ranked = rank(&user, pool, 5);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].job.title, "real");
    }

    #[test]
    fn test_rank_is_deterministic_across_runs() {
        let user = vec![1.0, 0.0];
        let jobs = vec![
            (make_job("a"), unit_at(0.3)),
            (make_job("b"), unit_at(0.8)),
        ];
        let first = rank(&user, jobs.clone(), 5);
        let second = rank(&user, jobs, 5);
        let ids_first: Vec<_> = first.iter().map(|s| (s.job.id, s.score.to_bits())).collect();
        let ids_second: Vec<_> = second.iter().map(|s| (s.job.id, s.score.to_bits())).collect();
        assert_eq!(ids_first, ids_second);
    }

    #[test]
    fn test_rank_top_one_picks_backend_engineer() {
        // Pool of two jobs scoring 0.82 and 0.10 against the profile;
        // top_k = 1 keeps exactly the 0.82 one.
        let user = vec![1.0, 0.0];
        let pool = vec![
            (make_job("Backend Engineer"), unit_at(0.82)),
            (make_job("Data Entry"), unit_at(0.10)),
        ];
        let ranked = rank(&user, pool, 1);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].job.title, "Backend Engineer");
        assert!((ranked[0].score - 0.82).abs() < 1e-6, "Score was {}", ranked[0].score);
    }
}
