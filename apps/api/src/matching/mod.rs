// Matching engine: lexical compatibility scoring and candidate ranking.
// This path never touches the network; scoring is pure and deterministic.

pub mod handlers;
pub mod scorer;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// One (resume, score) pairing produced by a ranking operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedMatch {
    pub resume_id: String,
    pub score: f64,
}

/// The match scorer seam. Implement this to swap backends without touching
/// the endpoint, handler, or caller code.
///
/// Carried in `AppState` as `Arc<dyn MatchScorer>`.
#[async_trait]
pub trait MatchScorer: Send + Sync {
    async fn score(&self, resume_text: &str, job_text: &str) -> Result<f64, AppError>;
}

/// Default backend: the pure lexical scorer. Fast, deterministic, no LLM call.
pub struct LexicalScorer;

#[async_trait]
impl MatchScorer for LexicalScorer {
    async fn score(&self, resume_text: &str, job_text: &str) -> Result<f64, AppError> {
        Ok(scorer::score(resume_text, job_text))
    }
}

/// Scores every candidate against the job text, sorts descending, and
/// truncates to the top N. The sort is stable, so candidates with equal
/// scores keep their input order.
pub async fn top_matches(
    match_scorer: &dyn MatchScorer,
    candidates: &[(String, String)],
    job_text: &str,
    top_n: usize,
) -> Result<Vec<RankedMatch>, AppError> {
    let mut ranked = Vec::with_capacity(candidates.len());
    for (resume_id, resume_text) in candidates {
        let score = match_scorer.score(resume_text, job_text).await?;
        ranked.push(RankedMatch {
            resume_id: resume_id.clone(),
            score,
        });
    }

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(top_n);
    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(id, text)| (id.to_string(), text.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_broader_coverage_ranks_strictly_higher() {
        let resumes = candidates(&[
            ("r1", "python sql"),
            ("r2", "python sql aws docker"),
        ]);
        let job = "python sql aws docker kubernetes";

        let ranked = top_matches(&LexicalScorer, &resumes, job, 3).await.unwrap();

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].resume_id, "r2");
        assert_eq!(ranked[1].resume_id, "r1");
        assert!(ranked[0].score > ranked[1].score);
    }

    #[tokio::test]
    async fn test_ties_preserve_candidate_input_order() {
        let resumes = candidates(&[
            ("first", "python sql"),
            ("second", "sql python"),
            ("third", "python sql"),
        ]);
        let job = "python sql";

        let ranked = top_matches(&LexicalScorer, &resumes, job, 3).await.unwrap();

        let ids: Vec<&str> = ranked.iter().map(|m| m.resume_id.as_str()).collect();
        assert_eq!(ids, ["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_result_is_truncated_to_top_n() {
        let resumes = candidates(&[
            ("r1", "python"),
            ("r2", "python sql"),
            ("r3", "python sql aws"),
            ("r4", "unrelated words entirely"),
        ]);
        let job = "python sql aws";

        let ranked = top_matches(&LexicalScorer, &resumes, job, 2).await.unwrap();

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].resume_id, "r3");
        assert_eq!(ranked[1].resume_id, "r2");
    }

    #[tokio::test]
    async fn test_no_candidates_yields_empty_ranking() {
        let ranked = top_matches(&LexicalScorer, &[], "python sql", 5)
            .await
            .unwrap();
        assert!(ranked.is_empty());
    }
}
