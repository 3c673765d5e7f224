use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One persisted match score: how well a resume covered a job's vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MatchScoreRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub resume_id: String,
    pub score: f64,
    pub created_at: DateTime<Utc>,
}

/// One persisted tailored application package.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub resume_id: String,
    pub resume_text: String,
    pub cover_letter: String,
    pub changes: Vec<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
