pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::documents;
use crate::matching::handlers as match_handlers;
use crate::state::AppState;
use crate::tailoring::handlers as tailor_handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Matching API
        .route("/api/v1/match", post(match_handlers::handle_match))
        .route(
            "/api/v1/jobs/:job_id/matches",
            get(match_handlers::handle_job_matches),
        )
        // Tailoring API
        .route("/api/v1/tailor", post(tailor_handlers::handle_tailor))
        .route(
            "/api/v1/applications/:id",
            get(tailor_handlers::handle_get_application),
        )
        // Document extraction
        .route(
            "/api/v1/documents/extract",
            post(documents::handle_extract),
        )
        .with_state(state)
}
