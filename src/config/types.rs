// ABOUTME: Strongly typed configuration enums shared by config loaders
// ABOUTME: Chat provider selection and log level parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Chat backend selected at startup
///
/// Exactly one provider is active per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatProviderType {
    /// Alibaba Qwen through its `OpenAI`-compatible chat completions endpoint
    #[default]
    Qwen,
    /// Google Gemini through the Generative Language `generateContent` API
    Gemini,
}

impl ChatProviderType {
    /// Environment variable for chat provider selection
    pub const ENV_VAR: &'static str = "FITGO_LLM_PROVIDER";

    /// Parse a provider selector; `None` for unsupported values
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "qwen" | "dashscope" => Some(Self::Qwen),
            "gemini" | "google" => Some(Self::Gemini),
            _ => None,
        }
    }
}

impl Display for ChatProviderType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Qwen => write!(f, "qwen"),
            Self::Gemini => write!(f, "gemini"),
        }
    }
}

/// Strongly typed log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational (default)
    #[default]
    Info,
    /// Debug output
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}
