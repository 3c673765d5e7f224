//! Structured-response parser — turns raw model text into a validated
//! `TailoringResult`, or fails with a `FormatError` when the mandatory
//! structure is absent.
//!
//! The model is instructed (see `prompts`) to wrap each logical section in
//! literal start/end markers. Extraction is plain substring search (the
//! bracket characters in the markers are never treated as pattern
//! metacharacters), and a section's region may span any number of newlines.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const START_RESUME: &str = "[START_RESUME]";
pub const END_RESUME: &str = "[END_RESUME]";
pub const START_COVER_LETTER: &str = "[START_COVER_LETTER]";
pub const END_COVER_LETTER: &str = "[END_COVER_LETTER]";
pub const START_CHANGES: &str = "[START_CHANGES]";
pub const END_CHANGES: &str = "[END_CHANGES]";

/// How much of the raw response is kept in error messages for diagnostics.
const EXCERPT_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error(
        "model output is missing the mandatory resume markers; output began: {raw_excerpt:?}"
    )]
    MissingResumeSection { raw_excerpt: String },

    #[error("resume section was present but blank; output began: {raw_excerpt:?}")]
    BlankResumeSection { raw_excerpt: String },
}

/// The validated tailoring package. On success `resume_text` is non-empty;
/// `cover_letter` and `changes` are best-effort and may be empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TailoringResult {
    pub resume_text: String,
    pub cover_letter: String,
    pub changes: Vec<String>,
}

/// Parses raw model output into a `TailoringResult`.
///
/// The resume section is mandatory: both markers must be present and the
/// region must be non-blank. Cover letter and changes degrade to `""` /
/// `vec![]` when their markers are absent. No semantic validation of the
/// content is performed.
pub fn parse(raw: &str) -> Result<TailoringResult, FormatError> {
    let resume_text = extract_section(raw, START_RESUME, END_RESUME)
        .ok_or_else(|| FormatError::MissingResumeSection {
            raw_excerpt: excerpt(raw),
        })?
        .trim()
        .to_string();

    if resume_text.is_empty() {
        return Err(FormatError::BlankResumeSection {
            raw_excerpt: excerpt(raw),
        });
    }

    let cover_letter = extract_section(raw, START_COVER_LETTER, END_COVER_LETTER)
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    let changes = extract_section(raw, START_CHANGES, END_CHANGES)
        .map(split_changes)
        .unwrap_or_default();

    Ok(TailoringResult {
        resume_text,
        cover_letter,
        changes,
    })
}

/// Returns the first region delimited by `start` and the first `end` after
/// it, exclusive of the markers themselves.
fn extract_section<'a>(raw: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let content_start = raw.find(start)? + start.len();
    let content_len = raw[content_start..].find(end)?;
    Some(&raw[content_start..content_start + content_len])
}

/// Splits the changes region into discrete descriptions: one per line,
/// trimmed, empty lines dropped, order preserved.
fn split_changes(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn excerpt(raw: &str) -> String {
    raw.trim().chars().take(EXCERPT_CHARS).collect()
}
