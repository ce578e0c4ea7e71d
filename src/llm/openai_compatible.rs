// ABOUTME: OpenAI-compatible chat completions provider
// ABOUTME: Used for Qwen through the DashScope compatible-mode endpoint
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # `OpenAI`-Compatible Provider
//!
//! Generic implementation for any endpoint speaking the `OpenAI` chat
//! completions wire format. The Qwen preset targets `DashScope`'s
//! compatible mode, where the base URL omits the `/v1` segment.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};

use super::{ChatMessage, ChatReply, LlmProvider};
use crate::constants::llm;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::utils::http_client::create_custom_client;

/// Chat completions path relative to the base URL
const CHAT_COMPLETIONS_PATH: &str = "v1/chat/completions";

// ============================================================================
// API Request/Response Types (OpenAI-compatible format)
// ============================================================================

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

impl From<&ChatMessage> for OpenAiMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role.as_str().to_owned(),
            content: msg.content.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for an `OpenAI`-compatible endpoint
#[derive(Clone)]
pub struct OpenAiCompatibleConfig {
    /// Base URL without the `/v1` segment
    pub base_url: String,
    /// Bearer API key
    pub api_key: Option<String>,
    /// Default model to use
    pub default_model: String,
    /// Provider name for logging and errors
    pub provider_name: &'static str,
    /// Provider display name
    pub display_name: &'static str,
    /// Per-request timeout
    pub timeout: Duration,
}

impl OpenAiCompatibleConfig {
    /// Qwen through `DashScope` compatible mode
    #[must_use]
    pub fn qwen(api_key: impl Into<String>) -> Self {
        Self {
            base_url: llm::QWEN_DEFAULT_BASE_URL.to_owned(),
            api_key: Some(api_key.into()),
            default_model: llm::QWEN_DEFAULT_MODEL.to_owned(),
            provider_name: "qwen",
            display_name: "Alibaba Qwen",
            timeout: Duration::from_secs(llm::DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Override the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the default model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Override the request timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Debug for OpenAiCompatibleConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("OpenAiCompatibleConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("default_model", &self.default_model)
            .field("provider_name", &self.provider_name)
            .field("timeout", &self.timeout)
            .finish()
    }
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Chat provider for `OpenAI`-compatible endpoints
pub struct OpenAiCompatibleProvider {
    config: OpenAiCompatibleConfig,
    client: Client,
}

impl OpenAiCompatibleProvider {
    /// Create a provider from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: OpenAiCompatibleConfig) -> Result<Self, AppError> {
        let client = create_custom_client(|builder| {
            builder
                .timeout(config.timeout)
                .connect_timeout(Duration::from_secs(llm::CONNECT_TIMEOUT_SECS))
        })?;

        Ok(Self { config, client })
    }

    /// Build the API URL for a given endpoint
    fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint
        )
    }

    /// Add authorization header if API key is configured
    fn add_auth_header(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(ref api_key) = self.config.api_key {
            request.header("Authorization", format!("Bearer {api_key}"))
        } else {
            request
        }
    }

    /// Parse error response from API
    fn parse_error_response(&self, status: reqwest::StatusCode, body: &str) -> AppError {
        let service = self.config.display_name;

        let Ok(error_response) = serde_json::from_str::<OpenAiErrorResponse>(body) else {
            return AppError::external_service(
                service,
                format!(
                    "API error ({status}): {}",
                    body.chars().take(200).collect::<String>()
                ),
            );
        };

        let message = error_response.error.message;
        match status.as_u16() {
            401 | 403 => AppError::external_auth(
                service,
                format!("API authentication failed: {message}"),
            ),
            429 => AppError::new(
                ErrorCode::ExternalRateLimited,
                format!("{service} rate limit reached: {message}"),
            ),
            _ => AppError::external_service(
                service,
                format!(
                    "{} - {message}",
                    error_response
                        .error
                        .error_type
                        .unwrap_or_else(|| "unknown".to_owned())
                ),
            ),
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &'static str {
        self.config.provider_name
    }

    fn display_name(&self) -> &'static str {
        self.config.display_name
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    #[instrument(skip_all, fields(provider = self.config.provider_name, model = %self.config.default_model))]
    async fn complete(&self, messages: &[ChatMessage]) -> AppResult<ChatReply> {
        let model = &self.config.default_model;
        let service = self.config.display_name;

        let openai_request = OpenAiRequest {
            model: model.clone(),
            messages: messages.iter().map(OpenAiMessage::from).collect(),
        };

        debug!(
            "Sending chat completion request to {} with {} messages",
            self.config.provider_name,
            openai_request.messages.len()
        );

        let http_request = self
            .client
            .post(self.api_url(CHAT_COMPLETIONS_PATH))
            .json(&openai_request);

        let response = self
            .add_auth_header(http_request)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                error!(
                    "Failed to send request to {}: {}",
                    self.config.provider_name, e
                );
                AppError::transport(service, format!("Failed to send request: {e}")).with_source(e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            let e = e.without_url();
            error!("Failed to read API response: {}", e);
            AppError::transport(service, format!("Failed to read response: {e}")).with_source(e)
        })?;

        if !status.is_success() {
            warn!(status = %status, "{} API error", self.config.provider_name);
            return Err(self.parse_error_response(status, &body));
        }

        let openai_response: OpenAiResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse API response: {}", e);
            AppError::decode(service, format!("Failed to parse response: {e}"))
        })?;

        let choice = openai_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::external_service(service, "API returned no choices"))?;

        let text = choice.message.content.unwrap_or_default();

        debug!(
            "Received response from {}: {} chars, finish_reason: {:?}",
            self.config.provider_name,
            text.len(),
            choice.finish_reason
        );

        Ok(ChatReply {
            text,
            model: openai_response.model.unwrap_or_else(|| model.clone()),
        })
    }
}

impl Debug for OpenAiCompatibleProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("OpenAiCompatibleProvider")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
