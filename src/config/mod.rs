// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Re-exports environment-driven gateway configuration and typed selectors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module
//!
//! - **Environment**: listener, COROS upstream and chat backend settings
//! - **Types**: chat provider selector and log level

/// Environment and server configuration
pub mod environment;
/// Strongly typed configuration enums
pub mod types;

pub use environment::{CorosConfig, HttpConfig, LlmConfig, ServerConfig};
pub use types::{ChatProviderType, LogLevel};
