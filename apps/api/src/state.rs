use std::sync::Arc;

use crate::config::Config;
use crate::tailoring::policy::RewritePolicy;
use crate::vocabulary::Vocabulary;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is read-only; requests never share mutable state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub vocabulary: Arc<Vocabulary>,
    /// LLM-with-fallback when an API key is configured, heuristic-only otherwise.
    pub rewrite_policy: Arc<RewritePolicy>,
}
