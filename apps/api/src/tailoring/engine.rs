//! Tailoring orchestration — one full request/response cycle.
//!
//! Flow: validate input → build prompt → LlmClient::call → parse →
//! persist application row → return typed result. Errors from the client
//! and parser propagate unchanged; there is no fallback to partial content.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::{LlmClient, LlmError};
use crate::tailoring::parser::{self, TailoringResult};
use crate::tailoring::prompts::{TAILOR_PROMPT_TEMPLATE, TAILOR_SYSTEM};

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// One tailoring request. Constructed per call, never retained: each call
/// owns its prompt, retry state, and parsed result, so concurrent requests
/// need no synchronization.
#[derive(Debug, Clone, Deserialize)]
pub struct TailoringRequest {
    pub job_id: Uuid,
    pub resume_id: String,
    pub resume_text: String,
    pub job_text: String,
    /// Optional prior match summary used to bias the prompt.
    #[serde(default)]
    pub match_summary: Option<BTreeMap<String, String>>,
}

/// Result of a completed tailoring operation, including the persisted row id.
#[derive(Debug, Clone, Serialize)]
pub struct TailoringOutcome {
    pub application_id: Uuid,
    pub result: TailoringResult,
    pub status: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestration
// ────────────────────────────────────────────────────────────────────────────

/// Runs the tailoring pipeline and persists the resulting application.
///
/// Input validation happens before any network call: empty resume or job
/// text is rejected as a validation error, not sent to the backend.
pub async fn tailor_application(
    pool: &PgPool,
    llm: &LlmClient,
    request: TailoringRequest,
) -> Result<TailoringOutcome, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "resume_text cannot be empty".to_string(),
        ));
    }
    if request.job_text.trim().is_empty() {
        return Err(AppError::Validation("job_text cannot be empty".to_string()));
    }

    info!(
        "Tailoring resume '{}' for job {}",
        request.resume_id, request.job_id
    );

    let prompt = build_tailor_prompt(&request);
    let response = llm.call(&prompt, TAILOR_SYSTEM).await?;
    let raw = response.text().ok_or(LlmError::EmptyContent)?;

    let result = parser::parse(raw)?;

    let application_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO applications
            (id, job_id, resume_id, resume_text, cover_letter, changes, status)
        VALUES ($1, $2, $3, $4, $5, $6, 'tailored')
        "#,
    )
    .bind(application_id)
    .bind(request.job_id)
    .bind(&request.resume_id)
    .bind(&result.resume_text)
    .bind(&result.cover_letter)
    .bind(&result.changes)
    .execute(pool)
    .await?;

    info!(
        "Stored application {} for job {} ({} change notes)",
        application_id,
        request.job_id,
        result.changes.len()
    );

    Ok(TailoringOutcome {
        application_id,
        result,
        status: "tailored".to_string(),
    })
}

/// Fills the fixed template with resume, job, and the optional match summary.
fn build_tailor_prompt(request: &TailoringRequest) -> String {
    let match_summary = match &request.match_summary {
        Some(summary) if !summary.is_empty() => summary
            .iter()
            .map(|(key, value)| format!("- {key}: {value}"))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => "(none)".to_string(),
    };

    TAILOR_PROMPT_TEMPLATE
        .replace("{resume_text}", &request.resume_text)
        .replace("{job_text}", &request.job_text)
        .replace("{match_summary}", &match_summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with_summary(summary: Option<BTreeMap<String, String>>) -> TailoringRequest {
        TailoringRequest {
            job_id: Uuid::new_v4(),
            resume_id: "resume-1".to_string(),
            resume_text: "Python and SQL engineer, five years.".to_string(),
            job_text: "Looking for Python, SQL, AWS.".to_string(),
            match_summary: summary,
        }
    }

    #[test]
    fn test_prompt_embeds_resume_and_job_text() {
        let prompt = build_tailor_prompt(&request_with_summary(None));
        assert!(prompt.contains("Python and SQL engineer, five years."));
        assert!(prompt.contains("Looking for Python, SQL, AWS."));
        assert!(!prompt.contains("{resume_text}"));
        assert!(!prompt.contains("{job_text}"));
    }

    #[test]
    fn test_prompt_without_match_summary_says_none() {
        let prompt = build_tailor_prompt(&request_with_summary(None));
        assert!(prompt.contains("(none)"));

        let empty = build_tailor_prompt(&request_with_summary(Some(BTreeMap::new())));
        assert!(empty.contains("(none)"));
    }

    #[test]
    fn test_prompt_renders_match_summary_as_key_value_lines() {
        let mut summary = BTreeMap::new();
        summary.insert("score".to_string(), "0.82".to_string());
        summary.insert("matched_skills".to_string(), "python, sql".to_string());

        let prompt = build_tailor_prompt(&request_with_summary(Some(summary)));
        assert!(prompt.contains("- matched_skills: python, sql"));
        assert!(prompt.contains("- score: 0.82"));
    }

    #[test]
    fn test_request_deserializes_without_match_summary() {
        let json = serde_json::json!({
            "job_id": Uuid::new_v4(),
            "resume_id": "r1",
            "resume_text": "text",
            "job_text": "jd"
        });
        let request: TailoringRequest = serde_json::from_value(json).unwrap();
        assert!(request.match_summary.is_none());
    }

    #[test]
    fn test_request_deserializes_with_match_summary() {
        let json = serde_json::json!({
            "job_id": Uuid::new_v4(),
            "resume_id": "r1",
            "resume_text": "text",
            "job_text": "jd",
            "match_summary": {"score": "0.7"}
        });
        let request: TailoringRequest = serde_json::from_value(json).unwrap();
        let summary = request.match_summary.unwrap();
        assert_eq!(summary.get("score").map(String::as_str), Some("0.7"));
    }
}
