//! Lexical compatibility scorer — pure, deterministic, no I/O.
//!
//! Normalizes both texts to stopword-filtered token sets and measures how
//! much of the job's vocabulary the resume covers, smoothed through a
//! logistic transform. Safe to run in parallel across any number of
//! candidates; the stopword list is the only shared (read-only) state.

use std::collections::HashSet;

/// Closed list of common English function words dropped during tokenization.
const STOPWORDS: &[&str] = &[
    "a", "about", "after", "all", "am", "an", "and", "any", "are", "as", "at", "be", "because",
    "been", "before", "being", "but", "by", "can", "could", "did", "do", "does", "each", "few",
    "for", "from", "had", "has", "have", "having", "he", "her", "his", "how", "i", "if", "in",
    "into", "is", "it", "its", "just", "me", "more", "most", "my", "no", "nor", "not", "of",
    "off", "on", "or", "our", "out", "she", "should", "so", "some", "such", "than", "that",
    "the", "their", "them", "then", "there", "these", "they", "this", "those", "through", "to",
    "too", "up", "was", "we", "were", "what", "when", "where", "which", "who", "why", "will",
    "with", "would", "you", "your",
];

/// Builds the set of normalized tokens for one text: every character that is
/// neither alphanumeric nor whitespace is removed, the remainder is
/// lower-cased and split on whitespace, and stopwords are dropped.
/// Duplicates collapse; order is irrelevant.
pub fn token_set(text: &str) -> HashSet<String> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    cleaned
        .to_lowercase()
        .split_whitespace()
        .filter(|token| !STOPWORDS.contains(token))
        .map(str::to_string)
        .collect()
}

/// Scores a resume against a job description, returning a value in [0, 1].
///
/// The raw ratio is `|resume ∩ job| / |job|` — job-requirement coverage, not
/// symmetric similarity, so `score(a, b) != score(b, a)` in general. The raw
/// ratio then passes through a logistic transform centered at 0.25 with
/// steepness 6, which compresses noisy low-overlap ratios toward zero and
/// rewards covering more than about a quarter of the job's vocabulary.
///
/// Returns exactly 0.0 when either text normalizes to an empty token set.
pub fn score(resume_text: &str, job_text: &str) -> f64 {
    let resume_tokens = token_set(resume_text);
    let job_tokens = token_set(job_text);

    if resume_tokens.is_empty() || job_tokens.is_empty() {
        return 0.0;
    }

    let overlap = job_tokens
        .iter()
        .filter(|token| resume_tokens.contains(*token))
        .count();
    let raw = overlap as f64 / job_tokens.len() as f64;

    1.0 / (1.0 + (-6.0 * (raw - 0.25)).exp())
}
