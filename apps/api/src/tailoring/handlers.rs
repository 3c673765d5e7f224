//! Axum route handlers for the Tailoring API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::ApplicationRow;
use crate::state::AppState;
use crate::tailoring::engine::{tailor_application, TailoringRequest};

#[derive(Debug, Serialize)]
pub struct TailorResponse {
    pub application_id: Uuid,
    pub resume_text: String,
    pub cover_letter: String,
    pub changes: Vec<String>,
    pub status: String,
}

/// POST /api/v1/tailor
///
/// Full tailoring pipeline: prompt → model call with retry → structured
/// parse → persist. Client and parser errors surface with their own codes so
/// callers can tell configuration, transient, and format failures apart.
pub async fn handle_tailor(
    State(state): State<AppState>,
    Json(request): Json<TailoringRequest>,
) -> Result<Json<TailorResponse>, AppError> {
    let outcome = tailor_application(&state.db, &state.llm, request).await?;

    Ok(Json(TailorResponse {
        application_id: outcome.application_id,
        resume_text: outcome.result.resume_text,
        cover_letter: outcome.result.cover_letter,
        changes: outcome.result.changes,
        status: outcome.status,
    }))
}

/// GET /api/v1/applications/:id
///
/// Returns a stored application package.
pub async fn handle_get_application(
    State(state): State<AppState>,
    Path(application_id): Path<Uuid>,
) -> Result<Json<ApplicationRow>, AppError> {
    let application =
        sqlx::query_as::<_, ApplicationRow>("SELECT * FROM applications WHERE id = $1")
            .bind(application_id)
            .fetch_optional(&state.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Application {application_id} not found")))?;

    Ok(Json(application))
}
