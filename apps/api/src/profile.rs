//! Profile Builder — renders a user's latest parsed résumé into the one
//! canonical text blob the embedder scores against.

use anyhow::Result;
use serde::Deserialize;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::models::resume::ResumeRow;

/// Structured sections of a parsed résumé. Every section is optional;
/// the extraction collaborator only fills in what it found.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParsedResume {
    pub skills: Option<Vec<String>>,
    pub experience: Option<Vec<String>>,
    pub education: Option<Vec<String>>,
}

/// Returns the user's most recently created résumé, if any.
pub async fn latest_resume(pool: &PgPool, user_id: Uuid) -> Result<Option<ResumeRow>> {
    Ok(sqlx::query_as::<_, ResumeRow>(
        "SELECT * FROM resumes WHERE user_id = $1 ORDER BY created_at DESC LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?)
}

/// Builds the profile text for a user from their latest résumé.
/// Returns an empty string when the user has no résumé or the résumé
/// carries no structured sections; downstream treats that as "no
/// recommendations possible", not as an error.
pub async fn build_profile(pool: &PgPool, user_id: Uuid) -> Result<String> {
    let resume = match latest_resume(pool, user_id).await? {
        Some(r) => r,
        None => return Ok(String::new()),
    };

    let parsed: ParsedResume = match serde_json::from_value(resume.parsed_data) {
        Ok(p) => p,
        Err(e) => {
            warn!("Resume {} has unreadable parsed_data: {e}", resume.id);
            ParsedResume::default()
        }
    };

    Ok(build_profile_text(&parsed))
}

/// Concatenates the present sections in a fixed order with stable labels,
/// so an unchanged résumé always produces the same text. Missing sections
/// are omitted, never replaced with placeholders.
pub fn build_profile_text(parsed: &ParsedResume) -> String {
    let mut parts = Vec::new();

    if let Some(skills) = &parsed.skills {
        parts.push(format!("Skills: {}", skills.join(", ")));
    }
    if let Some(experience) = &parsed.experience {
        parts.push(format!("Experience: {}", experience.join(" ")));
    }
    if let Some(education) = &parsed.education {
        parts.push(format!("Education: {}", education.join(" ")));
    }

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_resume() -> ParsedResume {
        ParsedResume {
            skills: Some(vec!["Rust".to_string(), "SQL".to_string()]),
            experience: Some(vec![
                "Backend engineer at Acme.".to_string(),
                "Built billing systems.".to_string(),
            ]),
            education: Some(vec!["BSc Computer Science".to_string()]),
        }
    }

    #[test]
    fn test_sections_rendered_in_fixed_order() {
        let text = build_profile_text(&full_resume());
        let skills_pos = text.find("Skills:").unwrap();
        let experience_pos = text.find("Experience:").unwrap();
        let education_pos = text.find("Education:").unwrap();
        assert!(skills_pos < experience_pos);
        assert!(experience_pos < education_pos);
    }

    #[test]
    fn test_skills_joined_with_commas() {
        let text = build_profile_text(&full_resume());
        assert!(text.contains("Skills: Rust, SQL"));
    }

    #[test]
    fn test_missing_sections_are_omitted() {
        let parsed = ParsedResume {
            skills: Some(vec!["Rust".to_string()]),
            experience: None,
            education: None,
        };
        let text = build_profile_text(&parsed);
        assert_eq!(text, "Skills: Rust");
        assert!(!text.contains("Experience"));
        assert!(!text.contains("Education"));
    }

    #[test]
    fn test_empty_resume_yields_empty_string() {
        assert_eq!(build_profile_text(&ParsedResume::default()), "");
    }

    #[test]
    fn test_stable_across_repeated_builds() {
        let resume = full_resume();
        assert_eq!(build_profile_text(&resume), build_profile_text(&resume));
    }
}
