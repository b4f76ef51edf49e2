//! LLM-backed rewrite behind a trait so the policy can swap or fake it.

use async_trait::async_trait;
use tracing::debug;

use crate::ingest::builder::finalize;
use crate::llm_client::{strip_json_fences, LlmClient, LlmError};
use crate::models::resume::StructuredResume;
use crate::tailoring::prompts::{build_rewrite_prompt, REWRITE_SYSTEM};

/// What the model produced.
#[derive(Debug, Clone, PartialEq)]
pub enum LlmRewrite {
    /// A JSON resume, already finalized.
    Structured(StructuredResume),
    /// Prose or Markdown.
    Text(String),
}

/// Carried in `RewritePolicy` as `Arc<dyn LlmRewriter>`.
#[async_trait]
pub trait LlmRewriter: Send + Sync {
    async fn rewrite(
        &self,
        resume: &StructuredResume,
        job_description: &str,
    ) -> Result<LlmRewrite, LlmError>;
}

/// Production rewriter on top of the Anthropic client.
pub struct AnthropicRewriter {
    llm: LlmClient,
}

impl AnthropicRewriter {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl LlmRewriter for AnthropicRewriter {
    async fn rewrite(
        &self,
        resume: &StructuredResume,
        job_description: &str,
    ) -> Result<LlmRewrite, LlmError> {
        let resume_json =
            serde_json::to_string_pretty(resume).map_err(|e| LlmError::Malformed(e.to_string()))?;
        let prompt = build_rewrite_prompt(&resume_json, job_description);

        let text = self.llm.call_text(&prompt, REWRITE_SYSTEM).await?;
        debug!("LLM rewrite returned {} characters", text.len());
        parse_llm_output(&text)
    }
}

/// Interprets raw model output.
///
/// Fences are stripped first. A JSON object must describe a resume or the
/// answer is `Malformed`; anything else is treated as a prose rewrite.
pub fn parse_llm_output(raw: &str) -> Result<LlmRewrite, LlmError> {
    if raw.trim().is_empty() {
        return Err(LlmError::EmptyContent);
    }

    let body = strip_json_fences(raw);
    if !(body.starts_with('{') || body.starts_with('[')) {
        return Ok(LlmRewrite::Text(body.to_string()));
    }

    let resume: StructuredResume =
        serde_json::from_str(body).map_err(|e| LlmError::Malformed(e.to_string()))?;

    if resume.name.trim().is_empty()
        && resume.work_experience.is_empty()
        && resume.skills.is_empty()
    {
        return Err(LlmError::Malformed(
            "JSON answer does not describe a resume".to_string(),
        ));
    }

    Ok(LlmRewrite::Structured(finalize(resume)))
}
