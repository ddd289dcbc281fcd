use async_trait::async_trait;
use reqwest::{header, Client};
use sdk::core_context::CompletionHandleImpl;
use sdk::errors::{EngineError, GatewayError};
use serde_json::Value;

use super::{ChatCompletionRequest, Message, ReplySource};
use crate::config::CompletionConfig;

/// Single-shot client for the chat-completions endpoint.
///
/// Holds only read-only configuration, so one instance is shared by every request
/// without locking. Each [`complete`](Self::complete) call makes exactly one
/// outbound request: no retries, no caching.
#[derive(Debug, Clone)]
pub struct CompletionGateway {
    config: CompletionConfig,
    endpoint: String,
    client: Client,
}

impl CompletionGateway {
    /// Build a gateway whose HTTP client enforces `config.timeout_secs` per request.
    pub fn new(config: CompletionConfig) -> Result<Self, EngineError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| EngineError::Network(format!("Failed to create HTTP client: {}", e)))?;

        if config.api_key.is_none() {
            tracing::warn!(
                env = %config.api_key_env,
                "No completion API key configured; upstream calls will be rejected"
            );
        }

        Ok(Self {
            endpoint: config.endpoint(),
            config,
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_request(&self, prompt: &str, system_prompt: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![Message::system(system_prompt), Message::user(prompt)],
            temperature: self.config.temperature,
            top_p: self.config.top_p,
            max_tokens: self.config.max_tokens,
        }
    }

    /// Ask the model for a reply and normalize it to plain text.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Unreachable`] if no response arrived (connect failure, timeout)
    /// - [`GatewayError::Upstream`] for a non-2xx status or a body that is not JSON
    pub async fn complete(
        &self,
        prompt: &str,
        system_prompt: &str,
    ) -> Result<String, GatewayError> {
        let payload = self.build_request(prompt, system_prompt);
        let api_key = self.config.api_key.as_deref().unwrap_or_default();

        tracing::debug!(model = %self.config.model, "Sending completion request");

        let resp = self
            .client
            .post(&self.endpoint)
            .header(header::AUTHORIZATION, format!("Bearer {}", api_key))
            .header(header::CONTENT_TYPE, "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(transport_error)?;

        let status = resp.status();
        let body = resp.text().await.map_err(transport_error)?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Completion service returned an error");
            return Err(GatewayError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        tracing::trace!(body = %body, "Completion service response");

        let parsed: Value = serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(error = %e, "Completion service returned a malformed body");
            GatewayError::Upstream {
                status: status.as_u16(),
                body: body.clone(),
            }
        })?;

        let source = ReplySource::extract(&parsed);
        tracing::debug!(source = source.kind(), "Completion reply normalized");
        Ok(source.into_text())
    }
}

/// Map a failure that happened before a full response was received
fn transport_error(e: reqwest::Error) -> GatewayError {
    let message = if e.is_timeout() {
        format!("Request to completion service timed out: {}", e)
    } else if e.is_connect() {
        format!("Cannot connect to completion service: {}", e)
    } else {
        format!("Completion request failed: {}", e)
    };
    tracing::warn!(error = %e, "Completion service unreachable");
    GatewayError::Unreachable(message)
}

#[async_trait]
impl CompletionHandleImpl for CompletionGateway {
    async fn complete(&self, prompt: &str, system_prompt: &str) -> Result<String, GatewayError> {
        CompletionGateway::complete(self, prompt, system_prompt).await
    }
}
