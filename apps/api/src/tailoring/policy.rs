//! Rewrite policy: heuristic only, or LLM first with heuristic fallback.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};

use crate::config::Config;
use crate::llm_client::{attempt_timeout, LlmClient, MODEL};
use crate::models::resume::StructuredResume;
use crate::tailoring::llm_rewriter::{AnthropicRewriter, LlmRewrite, LlmRewriter};
use crate::tailoring::rewriter::{rewrite, RewriteResult, RewriteStrategy};
use crate::vocabulary::Vocabulary;

pub enum RewritePolicy {
    HeuristicOnly,
    LlmWithFallback {
        rewriter: Arc<dyn LlmRewriter>,
        timeout: Duration,
    },
}

impl RewritePolicy {
    /// LLM-with-fallback when an API key is configured, heuristic-only otherwise.
    pub fn from_config(config: &Config) -> Result<Self> {
        match &config.anthropic_api_key {
            Some(key) => {
                // The policy timeout is the budget for the whole branch, retry included
                let timeout = Duration::from_secs(config.llm_timeout_secs);
                let llm = LlmClient::new(key.clone(), attempt_timeout(timeout))?;
                info!("Rewrite policy: LLM with heuristic fallback (model: {MODEL})");
                Ok(RewritePolicy::LlmWithFallback {
                    rewriter: Arc::new(AnthropicRewriter::new(llm)),
                    timeout,
                })
            }
            None => {
                info!("Rewrite policy: heuristic only (ANTHROPIC_API_KEY not set)");
                Ok(RewritePolicy::HeuristicOnly)
            }
        }
    }

    pub fn backend(&self) -> &'static str {
        match self {
            RewritePolicy::HeuristicOnly => "heuristic",
            RewritePolicy::LlmWithFallback { .. } => "llm",
        }
    }

    /// Always returns a complete result. LLM failures are logged and replaced
    /// by the heuristic rewrite; matches and improvements are always heuristic.
    pub async fn rewrite(
        &self,
        resume: &StructuredResume,
        job_description: &str,
        vocabulary: &Vocabulary,
    ) -> RewriteResult {
        let heuristic = rewrite(resume, job_description, vocabulary);

        let RewritePolicy::LlmWithFallback { rewriter, timeout } = self else {
            return heuristic;
        };

        match tokio::time::timeout(*timeout, rewriter.rewrite(resume, job_description)).await {
            Ok(Ok(LlmRewrite::Structured(rewritten_cv))) => {
                info!("LLM rewrite succeeded");
                RewriteResult {
                    rewritten_cv,
                    strategy: RewriteStrategy::Llm,
                    ..heuristic
                }
            }
            Ok(Ok(LlmRewrite::Text(text))) => {
                info!("LLM returned a prose rewrite, keeping heuristic structure");
                RewriteResult {
                    rewritten_text: Some(text),
                    ..heuristic
                }
            }
            Ok(Err(e)) => {
                warn!("LLM rewrite failed, falling back to heuristic: {e}");
                heuristic
            }
            Err(_) => {
                warn!("LLM rewrite timed out after {timeout:?}, falling back to heuristic");
                heuristic
            }
        }
    }
}
