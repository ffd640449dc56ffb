//! Chat-completions HTTP client.
//!
//! This module provides:
//! - HTTP client for OpenAI-compatible chat-completions backends
//! - Prompt size validation
//! - Status code and response mapping into [`ModelError`]
//!
//! Failures are returned immediately; callers decide what to show.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use super::config::ClientConfig;
use super::types::{ChatMessage, ChatRequest, ChatResponse};
use crate::config::SecretString;
use crate::error::ModelError;
use crate::traits::ChatModelTrait;

/// Maximum prompt length in bytes (100KB).
pub const MAX_PROMPT_LENGTH: usize = 100_000;

/// Seconds to wait when a 429 carries no usable `retry-after`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Chat-completions client with bearer authorization.
#[derive(Debug)]
pub struct ChatClient {
    client: Client,
    api_key: SecretString,
    config: ClientConfig,
}

impl ChatClient {
    /// Create a new chat client.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Network`] if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<SecretString>, config: ClientConfig) -> Result<Self, ModelError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ModelError::Network {
                message: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    /// Get the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn build_request(&self, prompt: &str) -> ChatRequest {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = self.config.system_prompt.as_deref() {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::user(prompt));

        ChatRequest {
            model: self.config.model.clone(),
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }

    fn validate_prompt(prompt: &str) -> Result<(), ModelError> {
        if prompt.trim().is_empty() {
            return Err(ModelError::InvalidRequest {
                message: "Prompt is empty".to_string(),
            });
        }
        if prompt.len() > MAX_PROMPT_LENGTH {
            return Err(ModelError::InvalidRequest {
                message: format!("Prompt too large: {} > {MAX_PROMPT_LENGTH}", prompt.len()),
            });
        }
        Ok(())
    }

    async fn execute(&self, request: &ChatRequest) -> Result<String, ModelError> {
        let url = self.config.completions_url();
        let start = std::time::Instant::now();

        tracing::debug!(
            url = %url,
            model = %request.model,
            max_tokens = request.max_tokens,
            timeout_ms = self.config.timeout_ms,
            "Starting chat completion request"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                if e.is_timeout() {
                    tracing::error!(
                        url = %url,
                        elapsed_ms,
                        timeout_ms = self.config.timeout_ms,
                        "Chat completion request timed out"
                    );
                    ModelError::Timeout {
                        timeout_ms: self.config.timeout_ms,
                    }
                } else {
                    tracing::error!(
                        url = %url,
                        elapsed_ms,
                        error = %e,
                        "Chat completion request failed"
                    );
                    ModelError::Network {
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        tracing::debug!(
            status = %status,
            elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Chat completion response received"
        );

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(ModelError::AuthenticationFailed);
            }
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
                return Err(ModelError::RateLimited {
                    retry_after_seconds: retry_after,
                });
            }
            StatusCode::SERVICE_UNAVAILABLE => {
                return Err(ModelError::ModelUnavailable {
                    model: request.model.clone(),
                });
            }
            s if !s.is_success() => {
                let body = response.text().await.unwrap_or_default();
                return Err(ModelError::UnexpectedResponse {
                    message: format!("Status {s}: {body}"),
                });
            }
            _ => {}
        }

        let body: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ModelError::Timeout {
                    timeout_ms: self.config.timeout_ms,
                }
            } else {
                ModelError::UnexpectedResponse {
                    message: format!("Failed to parse response: {e}"),
                }
            }
        })?;

        // An empty completion is still a completion; only a missing choice or
        // null content is malformed.
        body
            .first_text()
            .map(str::to_string)
            .ok_or_else(|| ModelError::UnexpectedResponse {
                message: "No content in response".to_string(),
            })
    }
}

#[async_trait]
impl ChatModelTrait for ChatClient {
    async fn invoke(&self, prompt: &str) -> Result<String, ModelError> {
        Self::validate_prompt(prompt)?;
        let request = self.build_request(prompt);
        self.execute(&request).await
    }
}
