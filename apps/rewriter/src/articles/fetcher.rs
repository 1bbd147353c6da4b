use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{header::CONTENT_TYPE, redirect, Client};
use tracing::{debug, info};
use url::Url;

use super::extract::extract_article;
use super::keywords::article_keywords;
use super::{ArticleFetcher, ArticleRecord, FetchError};

const MAX_REDIRECTS: usize = 10;

/// Downloads pages over HTTP and extracts them in-process.
#[derive(Clone)]
pub struct HttpArticleFetcher {
    client: Client,
}

impl HttpArticleFetcher {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(default_user_agent())
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ArticleFetcher for HttpArticleFetcher {
    async fn fetch(&self, url: &str) -> Result<ArticleRecord, FetchError> {
        let url = normalize_url(url)?;
        debug!("Fetching article {url}");

        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !is_html(content_type) {
                return Err(FetchError::NotHtml(content_type.to_string()));
            }
        }

        let html = response.text().await?;
        if html.trim().is_empty() {
            return Err(FetchError::EmptyBody);
        }

        let extracted = extract_article(&html);
        if extracted.text.is_empty() {
            return Err(FetchError::NoContent);
        }

        let keywords = article_keywords(&extracted.title, &extracted.text);
        info!(
            "Fetched '{}' from {} ({} chars, {} keywords)",
            extracted.title,
            url,
            extracted.text.chars().count(),
            keywords.len()
        );

        Ok(ArticleRecord {
            url: url.to_string(),
            title: extracted.title,
            text: extracted.text,
            keywords,
            fetched_at: Utc::now(),
        })
    }
}

/// Parses and normalizes a user-supplied URL. Only absolute http(s) URLs pass.
fn normalize_url(input: &str) -> Result<Url, FetchError> {
    let trimmed = input.trim();
    let url = Url::parse(trimmed).map_err(|_| FetchError::InvalidUrl(trimmed.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(FetchError::InvalidUrl(trimmed.to_string())),
    }
}

fn is_html(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}

fn default_user_agent() -> String {
    format!(
        "{}/{} (rust; {})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS
    )
}
