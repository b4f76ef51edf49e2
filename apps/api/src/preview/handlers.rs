use axum::{
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::ingest::builder::finalize;
use crate::models::edit::ResumeEdit;
use crate::models::resume::StructuredResume;
use crate::preview::markdown::{markdown_file_name, render_markdown};

#[derive(Debug, Deserialize)]
pub struct EditRequest {
    pub cv: StructuredResume,
    #[serde(default)]
    pub edits: Vec<ResumeEdit>,
}

#[derive(Debug, Deserialize)]
pub struct MarkdownRequest {
    pub cv: StructuredResume,
}

/// POST /api/v1/cv/edit
/// Applies the edits in order; the first invalid index rejects the whole batch.
pub async fn handle_edit(Json(req): Json<EditRequest>) -> Result<Json<StructuredResume>, AppError> {
    let mut cv = req.cv;
    let count = req.edits.len();
    for edit in req.edits {
        cv.apply_edit(edit)?;
    }
    info!("Applied {count} resume edits");
    Ok(Json(finalize(cv)))
}

/// POST /api/v1/cv/markdown
pub async fn handle_markdown(Json(req): Json<MarkdownRequest>) -> Response {
    let markdown = render_markdown(&req.cv);
    let disposition = format!("attachment; filename=\"{}\"", markdown_file_name(&req.cv));
    (
        [
            (header::CONTENT_TYPE, "text/markdown; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        markdown,
    )
        .into_response()
}
