//! Axum route handlers for the Matching API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::{top_matches, RankedMatch};
use crate::models::application::MatchScoreRow;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CandidateResume {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub job_id: Uuid,
    pub job_text: String,
    pub resumes: Vec<CandidateResume>,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_top_n() -> usize {
    3
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub job_id: Uuid,
    pub matches: Vec<RankedMatch>,
}

#[derive(Debug, Serialize)]
pub struct JobMatchesResponse {
    pub job_id: Uuid,
    pub scores: Vec<MatchScoreRow>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/match
///
/// Ranks the submitted resumes against one job description and persists each
/// returned (job, resume, score) row. Never calls the LLM backend.
pub async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    if request.job_text.trim().is_empty() {
        return Err(AppError::Validation("job_text cannot be empty".to_string()));
    }
    if request.resumes.is_empty() {
        return Err(AppError::Validation(
            "at least one resume is required".to_string(),
        ));
    }
    for resume in &request.resumes {
        if resume.text.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "resume '{}' has empty text",
                resume.id
            )));
        }
    }

    let candidates: Vec<(String, String)> = request
        .resumes
        .iter()
        .map(|r| (r.id.clone(), r.text.clone()))
        .collect();

    let matches = top_matches(
        state.scorer.as_ref(),
        &candidates,
        &request.job_text,
        request.top_n,
    )
    .await?;

    for m in &matches {
        sqlx::query(
            r#"
            INSERT INTO match_scores (id, job_id, resume_id, score)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.job_id)
        .bind(&m.resume_id)
        .bind(m.score)
        .execute(&state.db)
        .await?;
    }

    info!(
        "Ranked {} resumes for job {} (kept top {})",
        request.resumes.len(),
        request.job_id,
        matches.len()
    );

    Ok(Json(MatchResponse {
        job_id: request.job_id,
        matches,
    }))
}

/// GET /api/v1/jobs/:job_id/matches
///
/// Returns all stored match scores for a job, best first.
pub async fn handle_job_matches(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobMatchesResponse>, AppError> {
    let scores = sqlx::query_as::<_, MatchScoreRow>(
        "SELECT * FROM match_scores WHERE job_id = $1 ORDER BY score DESC, created_at",
    )
    .bind(job_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(JobMatchesResponse { job_id, scores }))
}
