use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::CompletionError;
use crate::rewrite::RewriteError;

/// Application-level error type for the JSON API.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Download error: {0}")]
    Download(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<RewriteError> for AppError {
    fn from(err: RewriteError) -> Self {
        let message = err.user_message();
        match err {
            RewriteError::Validation(_) => AppError::Validation(message),
            RewriteError::Download { .. } => AppError::Download(message),
            RewriteError::Completion(CompletionError::RateLimitExhausted { attempts }) => {
                tracing::warn!("Completion gave up after {attempts} rate-limited attempts");
                AppError::RateLimited(message)
            }
            RewriteError::Completion(CompletionError::Failed(_)) => AppError::Llm(message),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Download(msg) => {
                tracing::warn!("Download error: {msg}");
                (StatusCode::BAD_GATEWAY, "DOWNLOAD_ERROR", msg.clone())
            }
            AppError::RateLimited(msg) => {
                tracing::warn!("Completion API rate limit: {msg}");
                (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED", msg.clone())
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (StatusCode::BAD_GATEWAY, "LLM_ERROR", msg.clone())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
