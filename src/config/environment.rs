// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses HTTP, COROS upstream and chat backend settings from environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration management
//!
//! Configuration is read once at startup. Values that only matter to a single
//! operation (the COROS account, the chat provider) are validated lazily so a
//! misconfigured account fails the login call rather than the whole process.

use std::env;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use super::types::{ChatProviderType, LogLevel};
use crate::constants::{coros, llm};
use crate::errors::{AppError, AppResult};

/// Environment variable names
pub mod vars {
    /// Bind host
    pub const HTTP_HOST: &str = "HTTP_HOST";
    /// Bind port
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// Inbound request timeout
    pub const REQUEST_TIMEOUT_SECS: &str = "REQUEST_TIMEOUT_SECS";
    /// Log level
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    /// COROS upstream base URL
    pub const COROS_API_BASE: &str = "COROS_API_BASE";
    /// COROS numeric account id
    pub const COROS_ACCOUNT: &str = "COROS_ACCOUNT";
    /// COROS password
    pub const COROS_PASSWORD: &str = "COROS_PASSWORD";
    /// COROS request timeout
    pub const COROS_TIMEOUT_SECS: &str = "COROS_TIMEOUT_SECS";
    /// Chat base URL override
    pub const LLM_BASE_URL: &str = "FITGO_LLM_BASE_URL";
    /// Chat API key
    pub const LLM_API_KEY: &str = "FITGO_LLM_API_KEY";
    /// Chat model override
    pub const LLM_MODEL: &str = "FITGO_LLM_MODEL";
    /// Chat request timeout
    pub const LLM_TIMEOUT_SECS: &str = "FITGO_LLM_TIMEOUT_SECS";
}

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize)]
pub struct HttpConfig {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Upper bound for handling one inbound request
    pub request_timeout_secs: u64,
}

impl HttpConfig {
    /// Socket address string for the listener
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Inbound request timeout as a `Duration`
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// COROS upstream configuration
#[derive(Clone)]
pub struct CorosConfig {
    /// Upstream base URL
    pub api_base: String,
    /// Raw account id as configured
    pub account: Option<String>,
    /// Account password as configured
    pub password: Option<String>,
    /// Timeout for each upstream request
    pub timeout_secs: u64,
}

impl CorosConfig {
    /// Numeric account id for the login payload
    ///
    /// # Errors
    ///
    /// `ConfigMissing` when unset, `ConfigInvalid` when not an integer.
    pub fn login_account(&self) -> AppResult<i64> {
        let raw = self
            .account
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                AppError::config_missing(format!("{} is not set", vars::COROS_ACCOUNT))
            })?;

        raw.parse().map_err(|_| {
            AppError::config_invalid(format!("{} must be a numeric account id", vars::COROS_ACCOUNT))
        })
    }

    /// Password for the login payload
    ///
    /// # Errors
    ///
    /// `ConfigMissing` when unset or empty.
    pub fn login_password(&self) -> AppResult<&str> {
        self.password
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::config_missing(format!("{} is not set", vars::COROS_PASSWORD)))
    }

    /// Upstream request timeout as a `Duration`
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Debug for CorosConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CorosConfig")
            .field("api_base", &self.api_base)
            .field("account", &self.account)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Chat backend configuration
#[derive(Clone)]
pub struct LlmConfig {
    /// Provider selector as configured (`qwen`, `gemini`)
    pub provider: String,
    /// Base URL override; provider default when `None`
    pub base_url: Option<String>,
    /// API key
    pub api_key: Option<String>,
    /// Model override; provider default when `None`
    pub model: Option<String>,
    /// Timeout for each chat request
    pub timeout_secs: u64,
}

impl LlmConfig {
    /// Resolve the configured provider selector
    ///
    /// # Errors
    ///
    /// `ConfigInvalid` for an unsupported provider name.
    pub fn provider_type(&self) -> AppResult<ChatProviderType> {
        ChatProviderType::parse(&self.provider).ok_or_else(|| {
            AppError::config_invalid(format!(
                "Unsupported chat provider '{}' (set {} to qwen or gemini)",
                self.provider,
                ChatProviderType::ENV_VAR
            ))
        })
    }

    /// API key, required by both providers
    ///
    /// # Errors
    ///
    /// `ConfigMissing` when unset or empty.
    pub fn require_api_key(&self) -> AppResult<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AppError::config_missing(format!("{} is not set", vars::LLM_API_KEY)))
    }

    /// Chat request timeout as a `Duration`
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Debug for LlmConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Complete gateway configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listener
    pub http: HttpConfig,
    /// Log level
    pub log_level: LogLevel,
    /// COROS upstream
    pub coros: CorosConfig,
    /// Chat backend
    pub llm: LlmConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// A `.env` file in the working directory is loaded first when present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` when a numeric variable cannot be parsed.
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        if let Err(e) = dotenvy::dotenv() {
            warn!("No .env file found or failed to load: {e}");
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` when a numeric variable cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            http: HttpConfig {
                host: non_empty(vars::HTTP_HOST).unwrap_or_else(|| DEFAULT_HOST.to_owned()),
                port: parse_or(&lookup, vars::HTTP_PORT, DEFAULT_PORT)?,
                request_timeout_secs: parse_or(
                    &lookup,
                    vars::REQUEST_TIMEOUT_SECS,
                    DEFAULT_REQUEST_TIMEOUT_SECS,
                )?,
            },
            log_level: non_empty(vars::LOG_LEVEL)
                .map(|s| LogLevel::from_str_or_default(&s))
                .unwrap_or_default(),
            coros: CorosConfig {
                api_base: non_empty(vars::COROS_API_BASE)
                    .unwrap_or_else(|| coros::DEFAULT_API_BASE.to_owned()),
                account: non_empty(vars::COROS_ACCOUNT),
                password: lookup(vars::COROS_PASSWORD),
                timeout_secs: parse_or(
                    &lookup,
                    vars::COROS_TIMEOUT_SECS,
                    coros::DEFAULT_TIMEOUT_SECS,
                )?,
            },
            llm: LlmConfig {
                provider: non_empty(ChatProviderType::ENV_VAR)
                    .unwrap_or_else(|| ChatProviderType::default().to_string()),
                base_url: non_empty(vars::LLM_BASE_URL),
                api_key: non_empty(vars::LLM_API_KEY),
                model: non_empty(vars::LLM_MODEL),
                timeout_secs: parse_or(&lookup, vars::LLM_TIMEOUT_SECS, llm::DEFAULT_TIMEOUT_SECS)?,
            },
        })
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "FitGo Gateway Configuration:\n\
             - HTTP: {}\n\
             - Log Level: {}\n\
             - COROS API: {}\n\
             - COROS Account: {}\n\
             - Chat Provider: {}\n\
             - Chat API Key: {}",
            self.http.bind_address(),
            self.log_level,
            self.coros.api_base,
            if self.coros.account.is_some() && self.coros.password.is_some() {
                "Configured"
            } else {
                "Missing"
            },
            self.llm.provider,
            if self.llm.api_key.is_some() {
                "Configured"
            } else {
                "Missing"
            },
        )
    }
}

/// Parse an optional variable, falling back to `default` when unset
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> AppResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::config_invalid(format!("Invalid {key} value: {raw}"))),
    }
}
