// Article rewriting: request types, the orchestration pipeline, keyword
// highlighting and the HTML/JSON surfaces.
// All completion calls go through llm_client.

pub mod handlers;
pub mod highlight;
pub mod orchestrator;
pub mod prompts;
pub mod views;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::articles::{ArticleRecord, FetchError};
use crate::llm_client::CompletionError;

pub use orchestrator::handle_rewrite;

/// One rewrite action as submitted by the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RewriteRequest {
    pub url1: String,
    pub url2: String,
    pub keyword_override: Option<Vec<String>>,
}

/// Everything the page shows after a successful rewrite.
///
/// Article texts are previews; `rewritten_text` is HTML with `<mark>` hits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteResult {
    pub article1: ArticleRecord,
    pub article2: ArticleRecord,
    pub rewritten_text: String,
    pub keywords_used: Vec<String>,
}

#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("{0}")]
    Validation(String),

    #[error("Error downloading articles: {source} ({url})")]
    Download {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error(transparent)]
    Completion(#[from] CompletionError),
}

impl RewriteError {
    /// Text shown to the user in place of a result.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// Splits a comma-separated keyword field into trimmed, non-empty entries.
pub fn parse_keyword_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keyword_list_trims_and_drops_blanks() {
        assert_eq!(
            parse_keyword_list(" harbour , , New York,cranes ,"),
            vec!["harbour", "New York", "cranes"]
        );
    }

    #[test]
    fn test_parse_keyword_list_of_blank_input_is_empty() {
        assert!(parse_keyword_list("").is_empty());
        assert!(parse_keyword_list(" ,  , ").is_empty());
    }

    #[test]
    fn test_user_messages() {
        let download = RewriteError::Download {
            url: "https://example.com/a".to_string(),
            source: FetchError::Status(404),
        };
        assert_eq!(
            download.user_message(),
            "Error downloading articles: request failed with status 404 (https://example.com/a)"
        );

        let exhausted = RewriteError::from(CompletionError::RateLimitExhausted { attempts: 3 });
        assert_eq!(exhausted.user_message(), "Failed after multiple retries");

        let failed = RewriteError::from(CompletionError::Failed("bad key".to_string()));
        assert_eq!(failed.user_message(), "Error: bad key");
    }
}
