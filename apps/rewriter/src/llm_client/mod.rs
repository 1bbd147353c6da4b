/// LLM Client — the single point of entry for chat-completion calls.
///
/// The retry policy lives here; the wire format lives behind `ChatBackend`
/// (see `openai`), so the policy can be exercised against scripted backends.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod openai;

pub use openai::OpenAiBackend;

/// A single role-tagged chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Failure of a single backend call.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The remote API signalled rate limiting (HTTP 429).
    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("{0}")]
    Other(String),
}

/// Terminal outcome of a `complete` call that produced no text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompletionError {
    #[error("Failed after multiple retries")]
    RateLimitExhausted { attempts: u32 },

    #[error("Error: {0}")]
    Failed(String),
}

/// One round trip to a chat-completion API.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send(&self, messages: &[ChatMessage]) -> Result<String, BackendError>;
}

/// Chat-completion client with a bounded, fixed-interval retry on rate limiting.
#[derive(Clone)]
pub struct CompletionClient {
    backend: Arc<dyn ChatBackend>,
    max_attempts: u32,
    backoff: Duration,
}

impl CompletionClient {
    pub fn new(backend: Arc<dyn ChatBackend>, max_attempts: u32, backoff: Duration) -> Self {
        Self {
            backend,
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Sends `messages`, retrying only when the backend reports rate limiting.
    ///
    /// Any other failure is returned at once as `CompletionError::Failed`.
    /// Exhausting every attempt on rate limits yields `RateLimitExhausted`.
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        for attempt in 1..=self.max_attempts {
            match self.backend.send(messages).await {
                Ok(text) => {
                    debug!(attempt, "completion succeeded ({} chars)", text.len());
                    return Ok(text);
                }
                Err(BackendError::RateLimited(detail)) => {
                    warn!(
                        "completion attempt {}/{} rate limited: {}",
                        attempt, self.max_attempts, detail
                    );
                    if attempt < self.max_attempts {
                        tokio::time::sleep(self.backoff).await;
                    }
                }
                Err(BackendError::Other(description)) => {
                    warn!("completion attempt {attempt} failed: {description}");
                    return Err(CompletionError::Failed(description));
                }
            }
        }

        Err(CompletionError::RateLimitExhausted {
            attempts: self.max_attempts,
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Backend that replays a fixed script of outcomes and records every call.
    pub struct ScriptedBackend {
        script: Mutex<VecDeque<Result<String, BackendError>>>,
        pub calls: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedBackend {
        pub fn new(script: Vec<Result<String, BackendError>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ChatBackend for ScriptedBackend {
        async fn send(&self, messages: &[ChatMessage]) -> Result<String, BackendError> {
            self.calls.lock().unwrap().push(messages.to_vec());
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(BackendError::RateLimited("script exhausted".to_string())))
        }
    }
}
