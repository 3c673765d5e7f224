//! Document-source collaborator: turns uploaded resume/job files into plain
//! text. The matching and tailoring core only ever sees extracted text;
//! file-format internals stop at this boundary.

use axum::extract::Multipart;
use axum::Json;
use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub filename: String,
    pub characters: usize,
    pub text: String,
}

/// POST /api/v1/documents/extract
///
/// Accepts one multipart `file` field (.pdf, .txt, or .md) and returns its
/// plain-text content, ready to feed into the match or tailor endpoints.
pub async fn handle_extract(mut multipart: Multipart) -> Result<Json<ExtractResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart payload: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload").to_string();
        let data: Bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?;

        let text = extract_text(&filename, &data)?;
        info!("Extracted {} characters from '{}'", text.len(), filename);

        return Ok(Json(ExtractResponse {
            characters: text.chars().count(),
            filename,
            text,
        }));
    }

    Err(AppError::Validation(
        "multipart field 'file' is required".to_string(),
    ))
}

/// Dispatches on file extension. Unknown types are rejected up front;
/// recognized types that yield no text are unprocessable.
fn extract_text(filename: &str, data: &[u8]) -> Result<String, AppError> {
    let extension = std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let text = match extension.as_str() {
        "pdf" => pdf_extract::extract_text_from_mem(data).map_err(|e| {
            AppError::UnprocessableEntity(format!(
                "could not extract text from '{filename}': {e}"
            ))
        })?,
        "txt" | "md" => String::from_utf8(data.to_vec()).map_err(|_| {
            AppError::UnprocessableEntity(format!("'{filename}' is not valid UTF-8"))
        })?,
        other => {
            return Err(AppError::Validation(format!(
                "unsupported file type '.{other}' — upload .pdf, .txt, or .md"
            )))
        }
    };

    if text.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(format!(
            "'{filename}' contained no extractable text"
        )));
    }

    Ok(text)
}
