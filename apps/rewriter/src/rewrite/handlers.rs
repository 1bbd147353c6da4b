//! Axum route handlers for the rewrite page and the JSON API.

use askama::Template;
use axum::{extract::State, response::Html, Form, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::rewrite::views::{FormValues, Output, RewritePage};
use crate::rewrite::{handle_rewrite, parse_keyword_list, RewriteRequest, RewriteResult};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

/// Form fields posted by the page. Missing fields read as empty.
#[derive(Debug, Default, Deserialize)]
pub struct RewriteForm {
    #[serde(default)]
    pub url1: String,
    #[serde(default)]
    pub url2: String,
    #[serde(default)]
    pub keywords: String,
}

/// Keywords in a JSON request: a comma-separated string or a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum KeywordsInput {
    Text(String),
    List(Vec<String>),
}

#[derive(Debug, Deserialize)]
pub struct RewriteApiRequest {
    pub url1: String,
    pub url2: String,
    pub keywords: Option<KeywordsInput>,
}

impl From<RewriteApiRequest> for RewriteRequest {
    fn from(req: RewriteApiRequest) -> Self {
        let keyword_override = req.keywords.map(|k| match k {
            KeywordsInput::Text(raw) => parse_keyword_list(&raw),
            KeywordsInput::List(list) => list,
        });
        RewriteRequest {
            url1: req.url1,
            url2: req.url2,
            keyword_override,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /
pub async fn handle_index() -> Result<Html<String>, AppError> {
    render(RewritePage {
        form: FormValues::default(),
        output: Output::Empty,
    })
}

/// POST /rewrite
///
/// Runs the rewrite and renders the page. Failures are shown in place of the
/// result, so this always answers 200 once the form itself parsed.
pub async fn handle_rewrite_form(
    State(state): State<AppState>,
    Form(form): Form<RewriteForm>,
) -> Result<Html<String>, AppError> {
    let keyword_list = parse_keyword_list(&form.keywords);
    let request = RewriteRequest {
        url1: form.url1.clone(),
        url2: form.url2.clone(),
        keyword_override: (!keyword_list.is_empty()).then_some(keyword_list),
    };

    let output = match handle_rewrite(
        state.fetcher.as_ref(),
        &state.llm,
        request,
        state.config.preview_chars,
    )
    .await
    {
        Ok(result) => Output::Rewritten(result),
        Err(e) => Output::Message(e.user_message()),
    };

    render(RewritePage {
        form: FormValues {
            url1: form.url1,
            url2: form.url2,
            keywords: form.keywords,
        },
        output,
    })
}

/// POST /api/v1/rewrite
pub async fn handle_rewrite_api(
    State(state): State<AppState>,
    Json(request): Json<RewriteApiRequest>,
) -> Result<Json<RewriteResult>, AppError> {
    let result = handle_rewrite(
        state.fetcher.as_ref(),
        &state.llm,
        request.into(),
        state.config.preview_chars,
    )
    .await?;

    Ok(Json(result))
}

fn render(page: RewritePage) -> Result<Html<String>, AppError> {
    page.render()
        .map(Html)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to render page: {e}")))
}
