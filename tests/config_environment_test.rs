// ABOUTME: Tests for environment-driven gateway configuration
// ABOUTME: Covers defaults, overrides, invalid numbers and lazily validated credentials
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::collections::HashMap;
use std::env;
use std::time::Duration;

use fitgo::config::environment::vars;
use fitgo::config::{ChatProviderType, LogLevel, ServerConfig};
use fitgo::constants::coros;
use fitgo::errors::ErrorCode;
use serial_test::serial;

fn load(pairs: &[(&str, &str)]) -> fitgo::errors::AppResult<ServerConfig> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    ServerConfig::from_lookup(|key| map.get(key).cloned())
}

#[test]
fn test_defaults_when_nothing_is_set() {
    let config = load(&[]).unwrap();

    assert_eq!(config.http.bind_address(), "0.0.0.0:8080");
    assert_eq!(config.http.request_timeout(), Duration::from_secs(300));
    assert_eq!(config.log_level, LogLevel::Info);
    assert_eq!(config.coros.api_base, coros::DEFAULT_API_BASE);
    assert_eq!(
        config.coros.timeout(),
        Duration::from_secs(coros::DEFAULT_TIMEOUT_SECS)
    );
    assert_eq!(config.llm.provider_type().unwrap(), ChatProviderType::Qwen);
    assert!(config.llm.api_key.is_none());
}

#[test]
fn test_overrides_are_applied() {
    let config = load(&[
        (vars::HTTP_HOST, "127.0.0.1"),
        (vars::HTTP_PORT, "9090"),
        (vars::LOG_LEVEL, "debug"),
        (vars::COROS_API_BASE, "http://localhost:4000"),
        (vars::COROS_ACCOUNT, "987654"),
        (vars::COROS_PASSWORD, "pw"),
        (ChatProviderType::ENV_VAR, "gemini"),
        (vars::LLM_API_KEY, "key"),
        (vars::LLM_MODEL, "gemini-1.5-pro"),
    ])
    .unwrap();

    assert_eq!(config.http.bind_address(), "127.0.0.1:9090");
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.coros.api_base, "http://localhost:4000");
    assert_eq!(config.coros.login_account().unwrap(), 987_654);
    assert_eq!(config.coros.login_password().unwrap(), "pw");
    assert_eq!(config.llm.provider_type().unwrap(), ChatProviderType::Gemini);
    assert_eq!(config.llm.require_api_key().unwrap(), "key");
    assert_eq!(config.llm.model.as_deref(), Some("gemini-1.5-pro"));
}

#[test]
fn test_invalid_port_is_config_invalid() {
    let err = load(&[(vars::HTTP_PORT, "eighty")]).unwrap_err();

    assert_eq!(err.code, ErrorCode::ConfigInvalid);
    assert!(err.message.contains(vars::HTTP_PORT));
}

#[test]
fn test_blank_values_fall_back_to_defaults() {
    let config = load(&[(vars::HTTP_PORT, "  "), (vars::COROS_ACCOUNT, "")]).unwrap();

    assert_eq!(config.http.port, 8080);
    assert_eq!(
        config.coros.login_account().unwrap_err().code,
        ErrorCode::ConfigMissing
    );
}

#[test]
fn test_unknown_provider_fails_only_when_resolved() {
    let config = load(&[(ChatProviderType::ENV_VAR, "mystery")]).unwrap();

    assert_eq!(
        config.llm.provider_type().unwrap_err().code,
        ErrorCode::ConfigInvalid
    );
}

#[test]
fn test_debug_and_summary_hide_secrets() {
    let config = load(&[
        (vars::COROS_ACCOUNT, "1"),
        (vars::COROS_PASSWORD, "super-secret-pw"),
        (vars::LLM_API_KEY, "sk-very-secret"),
    ])
    .unwrap();

    let debug = format!("{config:?}");
    let summary = config.summary();

    for rendered in [&debug, &summary] {
        assert!(!rendered.contains("super-secret-pw"));
        assert!(!rendered.contains("sk-very-secret"));
    }
    assert!(summary.contains("COROS Account: Configured"));
}

#[test]
#[serial]
fn test_from_env_reads_process_environment() {
    env::set_var(vars::HTTP_PORT, "18080");
    env::set_var(ChatProviderType::ENV_VAR, "gemini");

    let config = ServerConfig::from_env();

    env::remove_var(vars::HTTP_PORT);
    env::remove_var(ChatProviderType::ENV_VAR);

    let config = config.unwrap();
    assert_eq!(config.http.port, 18080);
    assert_eq!(config.llm.provider, "gemini");
}
