// ABOUTME: Route module organization for the gateway HTTP endpoints
// ABOUTME: Assembles domain routers and applies CORS, tracing and timeout layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module
//!
//! Each domain module contains only route definitions and thin handler
//! functions that delegate to [`ServerResources`].

/// COROS data and analysis routes
pub mod coros;
/// Service index and health routes
pub mod health;

pub use coros::CorosRoutes;
pub use health::HealthRoutes;

use std::sync::Arc;

use axum::Router;
use tower_http::timeout::TimeoutLayer;

use crate::middleware::{request_trace_layer, setup_cors};
use crate::resources::ServerResources;

/// Build the complete application router
pub fn router(resources: Arc<ServerResources>) -> Router {
    let request_timeout = resources.config.http.request_timeout();

    Router::new()
        .merge(HealthRoutes::routes())
        .merge(CorosRoutes::routes(resources))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(request_trace_layer())
        .layer(setup_cors())
}
