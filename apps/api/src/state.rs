use std::sync::Arc;

use crate::analysis::cache::KeyInfoCache;
use crate::analysis::compare::MatchStrategy;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    /// Memoizes key-information summaries by exact resume text.
    pub key_info_cache: KeyInfoCache,
    /// Pluggable comparator behind the `Gemini` method label.
    pub matcher: Arc<dyn MatchStrategy>,
}
