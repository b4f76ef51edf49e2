//! Job tailoring: keyword matching, heuristic rewrite and the LLM fallback policy.

pub mod handlers;
pub mod keywords;
pub mod llm_rewriter;
pub mod policy;
pub mod prompts;
pub mod rewriter;
pub mod validation;
