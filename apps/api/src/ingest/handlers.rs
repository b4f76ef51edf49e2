use axum::extract::{Multipart, State};
use axum::Json;
use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::ingest::document::{extract, MIME_DOC, MIME_DOCX, MIME_PDF};
use crate::ingest::parser::parse_resume;
use crate::models::resume::StructuredResume;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResponse {
    pub resume: StructuredResume,
    pub extracted_text: String,
    pub extraction_degraded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded_reason: Option<String>,
}

struct Upload {
    bytes: Bytes,
    mime: String,
}

/// POST /api/v1/cv/parse
///
/// Multipart body: `file` (the document) and optional `mimeType`, which
/// overrides the part's own content type.
pub async fn handle_parse(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ParseResponse>, AppError> {
    let upload = read_upload(multipart).await?;
    info!("Parsing uploaded document ({} bytes, {})", upload.bytes.len(), upload.mime);

    let vocabulary = state.vocabulary.clone();
    let response = tokio::task::spawn_blocking(move || -> Result<ParseResponse, AppError> {
        let extracted = extract(&upload.bytes, &upload.mime)?;
        let resume = parse_resume(&extracted.text, &vocabulary);
        Ok(ParseResponse {
            resume,
            extraction_degraded: extracted.is_degraded(),
            degraded_reason: extracted.degraded_reason().map(str::to_string),
            extracted_text: extracted.text,
        })
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("extraction task failed: {e}")))??;

    Ok(Json(response))
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, AppError> {
    let mut file: Option<(Bytes, Option<String>)> = None;
    let mut explicit_mime: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let declared = field
                    .content_type()
                    .map(str::to_string)
                    .filter(|ct| ct != "application/octet-stream")
                    .or_else(|| field.file_name().and_then(mime_from_file_name).map(str::to_string));
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;
                file = Some((bytes, declared));
            }
            "mimeType" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid mimeType field: {e}")))?;
                explicit_mime = Some(text.trim().to_string()).filter(|m| !m.is_empty());
            }
            _ => {}
        }
    }

    let (bytes, declared) =
        file.ok_or_else(|| AppError::Validation("Missing 'file' field".to_string()))?;
    if bytes.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }
    let mime = explicit_mime
        .or(declared)
        .ok_or_else(|| AppError::Validation("Could not determine the document MIME type".to_string()))?;

    Ok(Upload { bytes, mime })
}

fn mime_from_file_name(name: &str) -> Option<&'static str> {
    let (_, ext) = name.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "pdf" => Some(MIME_PDF),
        "doc" => Some(MIME_DOC),
        "docx" => Some(MIME_DOCX),
        _ => None,
    }
}
