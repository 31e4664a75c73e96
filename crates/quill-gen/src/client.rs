//! HTTP client for the completion endpoint

use crate::auth;
use crate::types::{ChatMessage, ChatRequest, ChatResponse};
use async_trait::async_trait;
use quill_core::{GenerationConfig, QuillError, Result};
use std::time::Duration;

/// Capability the composition pipeline needs from a completion model.
///
/// One call, one completion. Retry and backoff live outside this trait so
/// fakes in tests stay trivial.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: usize,
        temperature: f32,
    ) -> Result<String>;
}

/// Client for an OpenAI-compatible chat completions endpoint
pub struct CompletionClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl CompletionClient {
    /// Build a client from configuration, resolving the API key from the
    /// configured environment variable.
    pub fn from_config(config: &GenerationConfig) -> Result<Self> {
        let api_key = auth::api_key(&config.api_key_env)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| QuillError::Other(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl TextGenerator for CompletionClient {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: usize,
        temperature: f32,
    ) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(system_prompt),
                ChatMessage::user(user_prompt),
            ],
            max_tokens,
            temperature,
        };

        tracing::debug!(model = %self.model, max_tokens, "sending completion request");

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    QuillError::Timeout("completion endpoint".to_string())
                } else {
                    QuillError::Network(format!("failed to send request: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(QuillError::Remote {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| QuillError::MalformedResponse(format!("failed to parse response: {}", e)))?;

        let content = parsed.into_content()?;
        tracing::debug!(chars = content.chars().count(), "completion received");
        Ok(content)
    }
}
