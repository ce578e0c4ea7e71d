// ABOUTME: Shared COROS session credential with expiry and serialized refresh
// ABOUTME: Logs in with the configured account on demand and reuses the token for seven days
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Session Cache
//!
//! Exactly one credential is shared by every request. The mutex guarding it
//! is held across the login call, so callers that all find the credential
//! expired queue behind a single refresh and then observe its result. The
//! login itself is bounded by the upstream client timeout.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::client::{CorosTransport, UpstreamRequest};
use super::envelope::Envelope;
use crate::config::CorosConfig;
use crate::constants::coros;
use crate::errors::{AppError, AppResult};

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Bearer token issued by the upstream login
#[derive(Clone)]
pub struct Credential {
    /// Opaque access token
    pub token: String,
    /// Instant after which the token must not be reused
    pub expires_at: DateTime<Utc>,
}

impl Credential {
    /// Whether the token may still be used at `now`
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Credential")
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[derive(Serialize)]
struct LoginForm<'a> {
    account: i64,
    #[serde(rename = "accountType")]
    account_type: u8,
    pwd: &'a str,
}

#[derive(Deserialize)]
struct LoginData {
    #[serde(rename = "accessToken", default)]
    access_token: Option<String>,
}

/// Cache of the single shared upstream credential
pub struct SessionCache {
    transport: Arc<dyn CorosTransport>,
    clock: Arc<dyn Clock>,
    config: CorosConfig,
    credential: Mutex<Option<Credential>>,
}

impl SessionCache {
    /// Create an empty cache; the first caller triggers a login
    #[must_use]
    pub fn new(
        transport: Arc<dyn CorosTransport>,
        clock: Arc<dyn Clock>,
        config: CorosConfig,
    ) -> Self {
        Self {
            transport,
            clock,
            config,
            credential: Mutex::new(None),
        }
    }

    /// Return a token valid at the current instant, logging in if needed
    ///
    /// # Errors
    ///
    /// - `ConfigMissing`/`ConfigInvalid` when the account is not configured
    /// - `ExternalAuthFailed` when the upstream rejects the login
    /// - transport and decode errors from the login exchange
    ///
    /// A failed login leaves the cache untouched.
    #[instrument(skip(self))]
    pub async fn valid_token(&self) -> AppResult<String> {
        let mut guard = self.credential.lock().await;
        let now = self.clock.now();

        if let Some(credential) = guard.as_ref().filter(|c| c.is_valid_at(now)) {
            debug!("Reusing cached COROS credential");
            return Ok(credential.token.clone());
        }

        if guard.is_some() {
            info!("COROS credential expired, logging in again");
        } else {
            info!("No COROS credential cached, logging in");
        }

        let fresh = self.login(now).await?;
        let token = fresh.token.clone();
        *guard = Some(fresh);
        drop(guard);

        Ok(token)
    }

    /// Snapshot of the cached credential, if any
    pub async fn current(&self) -> Option<Credential> {
        self.credential.lock().await.clone()
    }

    async fn login(&self, now: DateTime<Utc>) -> AppResult<Credential> {
        let form = LoginForm {
            account: self.config.login_account()?,
            account_type: coros::ACCOUNT_TYPE,
            pwd: self.config.login_password()?,
        };
        let body = serde_json::to_value(&form)
            .map_err(|e| AppError::internal(format!("Failed to encode login form: {e}")))?;

        let raw = self
            .transport
            .send(UpstreamRequest::post(coros::endpoints::LOGIN).with_json(body))
            .await?;

        let envelope: Envelope<LoginData> = Envelope::parse(&raw)?;
        if !envelope.is_success() {
            warn!(result = %envelope.result, "COROS login rejected");
            return Err(AppError::external_auth(
                coros::SERVICE,
                format!("login rejected: {}", envelope.message),
            ));
        }

        let token = envelope
            .data
            .and_then(|d| d.access_token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AppError::external_auth(coros::SERVICE, "login response carried no access token")
            })?;

        let expires_at = now + Duration::days(coros::TOKEN_TTL_DAYS);
        info!(%expires_at, "COROS login succeeded");

        Ok(Credential { token, expires_at })
    }
}

impl Debug for SessionCache {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SessionCache")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
