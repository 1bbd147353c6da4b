use std::sync::Arc;

use crate::articles::ArticleFetcher;
use crate::config::Config;
use crate::llm_client::CompletionClient;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Article download + extraction. Default: `HttpArticleFetcher`.
    pub fetcher: Arc<dyn ArticleFetcher>,
    pub llm: CompletionClient,
}
