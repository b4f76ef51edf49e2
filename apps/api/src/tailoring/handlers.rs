use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::resume::StructuredResume;
use crate::state::AppState;
use crate::tailoring::keywords::{extract_keywords, match_resume, KeywordSet, MatchResult};
use crate::tailoring::rewriter::RewriteResult;
use crate::tailoring::validation::validate_job_description;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TailorRequest {
    pub cv: StructuredResume,
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub keywords: KeywordSet,
    pub matches: MatchResult,
}

/// POST /api/v1/cv/match
pub async fn handle_match(
    State(state): State<AppState>,
    Json(req): Json<TailorRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    validate_job_description(&req.job_description, state.config.min_job_description_words)?;

    let keywords = extract_keywords(&req.job_description, &state.vocabulary);
    let matches = match_resume(&req.cv, &keywords);
    info!(
        "Matched {} skills and {} experience keywords against {} job keywords",
        matches.skills.len(),
        matches.experience.len(),
        keywords.len()
    );

    Ok(Json(MatchResponse { keywords, matches }))
}

/// POST /api/v1/cv/rewrite
pub async fn handle_rewrite(
    State(state): State<AppState>,
    Json(req): Json<TailorRequest>,
) -> Result<Json<RewriteResult>, AppError> {
    validate_job_description(&req.job_description, state.config.min_job_description_words)?;

    let result = state
        .rewrite_policy
        .rewrite(&req.cv, &req.job_description, &state.vocabulary)
        .await;
    info!(
        "Rewrite completed (policy: {}, strategy: {:?}, {} suggestions)",
        state.rewrite_policy.backend(),
        result.strategy,
        result.improvements.len()
    );

    Ok(Json(result))
}
