//! OpenAI chat-completions backend.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{BackendError, ChatBackend, ChatMessage};
use crate::config::Config;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct OpenAiBackend {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl OpenAiBackend {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        if !config.tls_verify {
            warn!("TLS certificate verification is DISABLED for the completion API client");
        }

        let client = Client::builder()
            .timeout(config.completion_timeout)
            .danger_accept_invalid_certs(!config.tls_verify)
            .build()?;

        Ok(Self {
            client,
            api_url: config.openai_api_url.clone(),
            api_key: config.openai_api_key.clone(),
            model: config.openai_model.clone(),
            max_tokens: config.openai_max_tokens,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatBackend for OpenAiBackend {
    async fn send(&self, messages: &[ChatMessage]) -> Result<String, BackendError> {
        let request_body = ChatRequest {
            model: &self.model,
            messages,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| BackendError::Other(format!("HTTP error: {e}")))?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Try to parse error message
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(BackendError::RateLimited(message));
            }
            return Err(BackendError::Other(format!(
                "API error (status {}): {}",
                status.as_u16(),
                message
            )));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Other(format!("JSON parse error: {e}")))?;

        if let Some(usage) = &chat.usage {
            debug!(
                "completion call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        chat.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| BackendError::Other("LLM returned empty content".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;

    fn backend_for(server: &MockServer) -> OpenAiBackend {
        let config = Config::from_lookup(|key| match key {
            "OPENAI_API_KEY" => Some("sk-test".to_string()),
            "OPENAI_API_URL" => Some(server.url("/v1/chat/completions")),
            _ => None,
        })
        .unwrap();
        OpenAiBackend::from_config(&config).unwrap()
    }

    #[tokio::test]
    async fn test_sends_model_messages_and_bearer_key() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/chat/completions")
                    .header("authorization", "Bearer sk-test")
                    .json_body(json!({
                        "model": "gpt-4-turbo",
                        "messages": [{"role": "user", "content": "Rewrite this"}],
                        "max_tokens": 2000
                    }));
                then.status(200).json_body(json!({
                    "choices": [{"message": {"role": "assistant", "content": "Rewritten."}}],
                    "usage": {"prompt_tokens": 5, "completion_tokens": 2}
                }));
            })
            .await;

        let text = backend_for(&server)
            .send(&[ChatMessage::user("Rewrite this")])
            .await
            .unwrap();

        assert_eq!(text, "Rewritten.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_429_is_reported_as_rate_limited() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(429)
                    .json_body(json!({"error": {"message": "Rate limit reached"}}));
            })
            .await;

        let err = backend_for(&server)
            .send(&[ChatMessage::user("hi")])
            .await
            .unwrap_err();

        match err {
            BackendError::RateLimited(message) => assert_eq!(message, "Rate limit reached"),
            other => panic!("expected rate limit, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_other_status_carries_api_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(401)
                    .json_body(json!({"error": {"message": "Incorrect API key provided"}}));
            })
            .await;

        let err = backend_for(&server)
            .send(&[ChatMessage::user("hi")])
            .await
            .unwrap_err();

        match err {
            BackendError::Other(message) => {
                assert!(message.contains("401"));
                assert!(message.contains("Incorrect API key provided"));
            }
            other => panic!("expected other failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_choices_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(200).json_body(json!({"choices": []}));
            })
            .await;

        let err = backend_for(&server)
            .send(&[ChatMessage::user("hi")])
            .await
            .unwrap_err();

        assert!(matches!(err, BackendError::Other(_)));
    }
}
