// ABOUTME: Unified LLM provider selector for startup-time provider switching
// ABOUTME: Wraps the Qwen and Gemini providers behind one chat entry point
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # LLM Provider Selector
//!
//! Set `FITGO_LLM_PROVIDER`:
//! - `qwen` (default): Qwen through `DashScope` compatible mode
//! - `gemini`: Google Gemini

use std::fmt;

use async_trait::async_trait;
use tracing::{debug, info};

use super::{
    ChatMessage, ChatReply, GeminiConfig, GeminiProvider, LlmProvider, OpenAiCompatibleConfig,
    OpenAiCompatibleProvider,
};
use crate::config::{ChatProviderType, LlmConfig};
use crate::errors::{AppError, AppResult};

/// The active chat backend
pub enum ChatProvider {
    /// Qwen via the `OpenAI`-compatible endpoint
    Qwen(OpenAiCompatibleProvider),
    /// Google Gemini
    Gemini(GeminiProvider),
}

impl ChatProvider {
    /// Build the configured provider
    ///
    /// # Errors
    ///
    /// `ConfigInvalid` for an unknown provider name, `ConfigMissing` when the
    /// API key is not set.
    pub fn from_config(config: &LlmConfig) -> Result<Self, AppError> {
        let provider_type = config.provider_type()?;

        info!(
            "Initializing LLM provider: {} (set {} to change)",
            provider_type,
            ChatProviderType::ENV_VAR
        );

        let api_key = config.require_api_key()?;

        let provider = match provider_type {
            ChatProviderType::Qwen => {
                let mut qwen = OpenAiCompatibleConfig::qwen(api_key).with_timeout(config.timeout());
                if let Some(base_url) = &config.base_url {
                    qwen = qwen.with_base_url(base_url);
                }
                if let Some(model) = &config.model {
                    qwen = qwen.with_model(model);
                }
                Self::Qwen(OpenAiCompatibleProvider::new(qwen)?)
            }
            ChatProviderType::Gemini => {
                let mut gemini = GeminiConfig::new(api_key).with_timeout(config.timeout());
                if let Some(base_url) = &config.base_url {
                    gemini = gemini.with_base_url(base_url);
                }
                if let Some(model) = &config.model {
                    gemini = gemini.with_model(model);
                }
                Self::Gemini(GeminiProvider::new(gemini)?)
            }
        };

        debug!(
            "Provider {} initialized with model: {}",
            provider.display_name(),
            provider.default_model()
        );

        Ok(provider)
    }

    fn inner(&self) -> &dyn LlmProvider {
        match self {
            Self::Qwen(p) => p,
            Self::Gemini(p) => p,
        }
    }
}

#[async_trait]
impl LlmProvider for ChatProvider {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn display_name(&self) -> &'static str {
        self.inner().display_name()
    }

    fn default_model(&self) -> &str {
        self.inner().default_model()
    }

    async fn complete(&self, messages: &[ChatMessage]) -> AppResult<ChatReply> {
        self.inner().complete(messages).await
    }
}

impl fmt::Debug for ChatProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatProvider")
            .field("name", &self.name())
            .field("default_model", &self.default_model())
            .finish()
    }
}
