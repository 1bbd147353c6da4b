// Article download and extraction.
// `fetcher` does the HTTP side, `extract` turns HTML into title + text,
// `keywords` derives frequency keywords from the extracted text.

pub mod extract;
pub mod fetcher;
pub mod keywords;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use fetcher::HttpArticleFetcher;

/// A downloaded and parsed article. Lives for one request only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub url: String,
    pub title: String,
    pub text: String,
    pub keywords: Vec<String>,
    pub fetched_at: DateTime<Utc>,
}

impl ArticleRecord {
    /// Copy of the record with `text` cut to at most `max_chars` characters,
    /// `"..."` appended when anything was cut.
    pub fn preview(&self, max_chars: usize) -> ArticleRecord {
        ArticleRecord {
            text: truncate_chars(&self.text, max_chars),
            ..self.clone()
        }
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL '{0}'")]
    InvalidUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request failed with status {0}")]
    Status(u16),

    #[error("expected an HTML page, got '{0}'")]
    NotHtml(String),

    #[error("empty response body")]
    EmptyBody,

    #[error("no article text found")]
    NoContent,
}

/// Retrieves and parses an article. Implementations must not retry.
#[async_trait]
pub trait ArticleFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<ArticleRecord, FetchError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    pub fn article(url: &str, title: &str, text: &str, keywords: &[&str]) -> ArticleRecord {
        ArticleRecord {
            url: url.to_string(),
            title: title.to_string(),
            text: text.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            fetched_at: Utc::now(),
        }
    }

    /// Fetcher serving canned articles by URL; unknown URLs fail with `Status(404)`.
    #[derive(Default)]
    pub struct StaticFetcher {
        pages: HashMap<String, ArticleRecord>,
        pub requested: Mutex<Vec<String>>,
    }

    impl StaticFetcher {
        pub fn with(mut self, record: ArticleRecord) -> Self {
            self.pages.insert(record.url.clone(), record);
            self
        }
    }

    #[async_trait]
    impl ArticleFetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> Result<ArticleRecord, FetchError> {
            self.requested.lock().unwrap().push(url.to_string());
            self.pages.get(url).cloned().ok_or(FetchError::Status(404))
        }
    }
}
