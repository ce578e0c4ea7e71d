// ABOUTME: Chat backend abstraction used by the running analyzer
// ABOUTME: Message types and the completion trait shared by the Qwen and Gemini clients
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Chat backends
//!
//! One backend is active per process. [`ChatProvider`] picks it from
//! configuration at startup; the analyzer only sees `dyn LlmProvider`.
//!
//! ```rust,no_run
//! use fitgo::llm::{ChatMessage, LlmProvider};
//!
//! async fn ask(backend: &dyn LlmProvider) {
//!     let reply = backend.complete(&[ChatMessage::user("How was my run?")]).await;
//! }
//! ```

mod gemini;
mod openai_compatible;
pub mod prompts;
mod provider;

pub use gemini::{GeminiConfig, GeminiProvider};
pub use openai_compatible::{OpenAiCompatibleConfig, OpenAiCompatibleProvider};
pub use provider::ChatProvider;

use async_trait::async_trait;

use crate::errors::AppResult;

/// Author of a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    /// Instructions framing the conversation
    System,
    /// End-user turn
    User,
    /// Earlier model turn
    Assistant,
}

impl MessageRole {
    /// Role name on the `OpenAI` wire format
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One turn of a conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Who wrote the turn
    pub role: MessageRole,
    /// Plain text body
    pub content: String,
}

impl ChatMessage {
    /// System instruction turn
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    /// User turn
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Prior model turn
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Text produced by a backend and the model that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    /// Reply body, usually Markdown
    pub text: String,
    /// Model name reported by the backend, or the one requested
    pub model: String,
}

/// A non-streaming chat completion backend
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short identifier used in log fields, e.g. `qwen`
    fn name(&self) -> &'static str;

    /// Human-readable backend name
    fn display_name(&self) -> &'static str;

    /// Model requested on every call
    fn default_model(&self) -> &str;

    /// Send the conversation and return the first reply
    ///
    /// # Errors
    ///
    /// Transport failures map to `ExternalServiceUnavailable`, rejected keys
    /// to `ExternalAuthFailed` and quota errors to `ExternalRateLimited`.
    async fn complete(&self, messages: &[ChatMessage]) -> AppResult<ChatReply>;
}
