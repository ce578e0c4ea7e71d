// ABOUTME: Shared HTTP client utilities with connection pooling and timeout configuration
// ABOUTME: Builds reqwest clients for the COROS upstream and chat backends
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use reqwest::{Client, ClientBuilder};
use std::time::Duration;

use crate::errors::{AppError, AppResult};

/// Connect timeout applied to every outbound client
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Create a new HTTP client with the given request timeout
///
/// Every outbound call made through the returned client is bounded, so a
/// stalled upstream cannot pin a request task forever.
///
/// # Errors
///
/// Returns an internal error if the TLS backend cannot be initialized.
pub fn client_with_timeout(timeout: Duration) -> AppResult<Client> {
    create_custom_client(|builder| {
        builder
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
    })
}

/// Create a new HTTP client with custom configuration
///
/// # Errors
///
/// Returns an internal error if the configured client cannot be built.
pub fn create_custom_client<F>(config_fn: F) -> AppResult<Client>
where
    F: FnOnce(ClientBuilder) -> ClientBuilder,
{
    config_fn(ClientBuilder::new())
        .build()
        .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))
}
