// ABOUTME: Shared test utilities for integration tests
// ABOUTME: Provides a scripted COROS transport, a manual clock and envelope builders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `fitgo`

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use fitgo::config::{CorosConfig, ServerConfig};
use fitgo::constants::coros::endpoints;
use fitgo::coros::{Clock, CorosTransport, UpstreamRequest};
use fitgo::errors::AppResult;
use serde_json::{json, Value};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("fitgo=warn")
            .with_test_writer()
            .try_init();
    });
}

type Responder = dyn Fn(&UpstreamRequest, usize) -> AppResult<String> + Send + Sync;

/// In-process `CorosTransport` answering from a closure
///
/// The closure receives the request and the number of logins performed so
/// far (including this one, for login requests).
pub struct ScriptedTransport {
    logins: AtomicUsize,
    requests: Mutex<Vec<UpstreamRequest>>,
    login_delay: Option<Duration>,
    responder: Box<Responder>,
}

impl ScriptedTransport {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&UpstreamRequest, usize) -> AppResult<String> + Send + Sync + 'static,
    {
        Self {
            logins: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            login_delay: None,
            responder: Box::new(responder),
        }
    }

    /// Logins succeed with `token-<n>`; data requests answer with `detail_body`
    pub fn with_detail(detail_body: String) -> Self {
        Self::new(move |request, login_no| {
            if is_login(request) {
                Ok(login_ok(&format!("token-{login_no}")))
            } else {
                Ok(detail_body.clone())
            }
        })
    }

    /// Logins succeed with `token-<n>`; data requests answer with an empty success envelope
    pub fn accepting() -> Self {
        Self::with_detail(envelope_ok(&json!({})))
    }

    /// Slow down every login, widening the window for concurrent callers
    #[must_use]
    pub const fn with_login_delay(mut self, delay: Duration) -> Self {
        self.login_delay = Some(delay);
        self
    }

    pub fn login_count(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<UpstreamRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Data requests only, in send order
    pub fn data_requests(&self) -> Vec<UpstreamRequest> {
        self.requests()
            .into_iter()
            .filter(|r| !is_login(r))
            .collect()
    }
}

#[async_trait]
impl CorosTransport for ScriptedTransport {
    async fn send(&self, request: UpstreamRequest) -> AppResult<String> {
        self.requests.lock().unwrap().push(request.clone());

        let login_no = if is_login(&request) {
            if let Some(delay) = self.login_delay {
                tokio::time::sleep(delay).await;
            }
            self.logins.fetch_add(1, Ordering::SeqCst) + 1
        } else {
            self.login_count()
        };

        (self.responder)(&request, login_no)
    }
}

pub fn is_login(request: &UpstreamRequest) -> bool {
    request.path == endpoints::LOGIN
}

/// Clock the test moves by hand
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn starting_2025() -> Self {
        Self::new(Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap())
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Account configuration pointing nowhere in particular
pub fn coros_config() -> CorosConfig {
    CorosConfig {
        api_base: "http://coros.invalid".to_owned(),
        account: Some("12345".to_owned()),
        password: Some("hashed-secret".to_owned()),
        timeout_secs: 5,
    }
}

/// Defaults plus a configured COROS account
pub fn server_config() -> ServerConfig {
    let mut config = ServerConfig::from_lookup(|_| None).unwrap();
    config.coros = coros_config();
    config
}

pub fn login_ok(token: &str) -> String {
    json!({
        "result": "0000",
        "message": "OK",
        "data": { "accessToken": token }
    })
    .to_string()
}

pub fn login_rejected(message: &str) -> String {
    json!({ "result": "0001", "message": message }).to_string()
}

pub fn envelope_ok(data: &Value) -> String {
    json!({ "result": "0000", "message": "OK", "data": data }).to_string()
}

pub fn envelope_failed(result: &str, message: &str) -> String {
    json!({ "result": result, "message": message }).to_string()
}

/// A split node (`type == 2`) with `n` kilometre children
pub fn split_node(n: usize, offset: usize) -> Value {
    let items: Vec<Value> = (0..n)
        .map(|i| json!({ "lapIndex": offset + i + 1, "distance": 100_000, "time": 36_000 }))
        .collect();
    json!({ "type": 2, "lapItemList": items })
}

pub fn shared<T>(value: T) -> Arc<T> {
    Arc::new(value)
}
