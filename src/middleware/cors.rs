// ABOUTME: CORS middleware configuration for HTTP API endpoints
// ABOUTME: Permits browser front-ends on any origin to call the gateway
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use http::{header::HeaderName, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Configure CORS for the gateway
///
/// Any origin is allowed. Preflight requests are answered by the layer
/// itself and never reach a handler.
///
/// # Allowed Headers
///
/// - `content-type`
/// - `authorization`
#[must_use]
pub fn setup_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("authorization"),
        ])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
}
