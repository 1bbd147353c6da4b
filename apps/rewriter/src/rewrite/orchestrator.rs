//! Rewrite pipeline.
//!
//! Flow: validate → fetch article1 → fetch article2 → pick keywords →
//!       build prompt → complete → highlight → assemble result.
//!
//! Strictly sequential. A fetch failure aborts before any completion call;
//! a completion failure discards the fetched articles.

use tracing::{info, warn};
use uuid::Uuid;

use crate::articles::{ArticleFetcher, ArticleRecord};
use crate::llm_client::{ChatMessage, CompletionClient};
use crate::rewrite::highlight::highlight;
use crate::rewrite::prompts::build_rewrite_prompt;
use crate::rewrite::{RewriteError, RewriteRequest, RewriteResult};

/// Runs one rewrite request end to end.
///
/// `preview_chars` bounds the article text carried in the result.
#[tracing::instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn handle_rewrite(
    fetcher: &dyn ArticleFetcher,
    llm: &CompletionClient,
    request: RewriteRequest,
    preview_chars: usize,
) -> Result<RewriteResult, RewriteError> {
    // Step 1: Validate
    let url1 = request.url1.trim();
    let url2 = request.url2.trim();
    if url1.is_empty() {
        return Err(RewriteError::Validation("url1 cannot be empty".to_string()));
    }
    if url2.is_empty() {
        return Err(RewriteError::Validation("url2 cannot be empty".to_string()));
    }

    // Step 2: Fetch both articles, first failure aborts
    let article1 = fetch(fetcher, url1).await?;
    let article2 = fetch(fetcher, url2).await?;

    // Step 3: Target keywords
    let keywords = target_keywords(request.keyword_override, &article1);
    info!(
        "Rewriting '{}' with {} keywords",
        article2.title,
        keywords.len()
    );

    // Step 4-5: Prompt and completion
    let prompt = build_rewrite_prompt(&keywords, &article2.text);
    let rewritten = llm
        .complete(&[ChatMessage::user(prompt)])
        .await
        .map_err(|e| {
            warn!("Rewrite failed: {e}");
            RewriteError::Completion(e)
        })?;

    // Step 6: Highlight and assemble
    let rewritten_text = highlight(&rewritten, &keywords);

    Ok(RewriteResult {
        article1: article1.preview(preview_chars),
        article2: article2.preview(preview_chars),
        rewritten_text,
        keywords_used: keywords,
    })
}

async fn fetch(fetcher: &dyn ArticleFetcher, url: &str) -> Result<ArticleRecord, RewriteError> {
    fetcher.fetch(url).await.map_err(|source| {
        warn!("Download failed for {url}: {source}");
        RewriteError::Download {
            url: url.to_string(),
            source,
        }
    })
}

/// The user's keywords when any survive trimming, else article1's keywords as-is.
fn target_keywords(keyword_override: Option<Vec<String>>, article1: &ArticleRecord) -> Vec<String> {
    let supplied: Vec<String> = keyword_override
        .unwrap_or_default()
        .into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect();

    if supplied.is_empty() {
        article1.keywords.clone()
    } else {
        supplied
    }
}
