// ABOUTME: Upstream HTTP client for the COROS team API
// ABOUTME: Builds authenticated requests with the device user agent and returns raw bodies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::{debug, error, instrument, warn};
use url::Url;

use crate::config::CorosConfig;
use crate::constants::coros;
use crate::errors::{AppError, AppResult};
use crate::utils::http_client::client_with_timeout;

/// One request against the upstream authority
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    /// HTTP method
    pub method: Method,
    /// Path relative to the configured base URL
    pub path: String,
    /// Access token; omitted for login
    pub credential: Option<String>,
    /// Query parameters, percent-encoded on the wire
    pub query: Vec<(String, String)>,
    /// JSON request body
    pub json_body: Option<Value>,
}

impl UpstreamRequest {
    /// Create a request with no credential, query or body
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            credential: None,
            query: Vec::new(),
            json_body: None,
        }
    }

    /// `GET` request for `path`
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// `POST` request for `path`
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Attach the access token
    #[must_use]
    pub fn with_credential(mut self, token: impl Into<String>) -> Self {
        self.credential = Some(token.into());
        self
    }

    /// Append a query parameter
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Attach a JSON body
    #[must_use]
    pub fn with_json(mut self, body: Value) -> Self {
        self.json_body = Some(body);
        self
    }
}

/// Transport seam between the session/aggregation layer and the network
///
/// Implementations return the raw response body regardless of HTTP status;
/// interpreting the envelope is the caller's job.
#[async_trait]
pub trait CorosTransport: Send + Sync {
    /// Send one request and return the raw body
    async fn send(&self, request: UpstreamRequest) -> AppResult<String>;
}

/// reqwest-backed transport against the real upstream
#[derive(Debug, Clone)]
pub struct HttpCorosClient {
    client: Client,
    base_url: String,
}

impl HttpCorosClient {
    /// Build a client for the configured base URL and timeout
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` if the base URL does not parse, or an internal
    /// error if the HTTP client cannot be built.
    pub fn new(config: &CorosConfig) -> AppResult<Self> {
        Url::parse(&config.api_base).map_err(|e| {
            AppError::config_invalid(format!("Invalid COROS API base '{}': {e}", config.api_base))
        })?;

        Ok(Self {
            client: client_with_timeout(config.timeout())?,
            base_url: config.api_base.trim_end_matches('/').to_owned(),
        })
    }

    /// Resolve the full URL for a request, percent-encoding every query value
    fn build_url(&self, request: &UpstreamRequest) -> AppResult<Url> {
        let raw = format!("{}/{}", self.base_url, request.path.trim_start_matches('/'));
        let mut url = Url::parse(&raw).map_err(|e| {
            AppError::config_invalid(format!("Invalid COROS request URL '{raw}': {e}"))
        })?;

        if !request.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(request.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }

        Ok(url)
    }
}

#[async_trait]
impl CorosTransport for HttpCorosClient {
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn send(&self, request: UpstreamRequest) -> AppResult<String> {
        let url = self.build_url(&request)?;

        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .header(reqwest::header::USER_AGENT, coros::USER_AGENT);

        if let Some(token) = &request.credential {
            builder = builder.header(coros::ACCESS_TOKEN_HEADER, token);
        }
        if let Some(body) = &request.json_body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            let e = e.without_url();
            error!("COROS request to {} failed: {e}", request.path);
            AppError::transport(coros::SERVICE, format!("Failed to send request: {e}"))
                .with_source(e)
        })?;

        let status = response.status();
        debug!("COROS API response status: {status}");
        if !status.is_success() {
            warn!(
                "COROS API returned non-success status {status} for {}",
                request.path
            );
        }

        response.text().await.map_err(|e| {
            let e = e.without_url();
            error!("Failed to read COROS response body: {e}");
            AppError::decode(coros::SERVICE, format!("Failed to read response body: {e}"))
                .with_source(e)
        })
    }
}
