use std::sync::Arc;

use sqlx::PgPool;

use crate::llm_client::LlmClient;
use crate::matching::MatchScorer;

/// Shared application state injected into all route handlers via Axum
/// extractors. Cloned per request; nothing here is per-call mutable, so
/// concurrent match and tailor operations need no locking.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub llm: LlmClient,
    /// Pluggable match scorer. Default: the pure LexicalScorer.
    pub scorer: Arc<dyn MatchScorer>,
}
