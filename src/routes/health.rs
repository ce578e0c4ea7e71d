// ABOUTME: Health check and service index route handlers
// ABOUTME: Provides the root index and liveness endpoint for monitoring infrastructure
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Health check routes for service monitoring

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

/// Routes served by the gateway, listed by the index endpoint
const ENDPOINTS: &[(&str, &str)] = &[
    ("GET /health", "Liveness check"),
    ("GET /coros/login", "Ensure a valid COROS session"),
    (
        "GET /coros/sports/summary?labelId=&sportType=",
        "Split laps and summary for one activity",
    ),
    (
        "GET /coros/active?size=&pageNumber=",
        "One page of the activity list",
    ),
    (
        "GET /coros/ai/summary?labelId=&sportType=",
        "AI analysis report for one running activity",
    ),
];

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the index and health routes
    pub fn routes() -> Router {
        async fn index_handler() -> Json<Value> {
            let endpoints: Vec<Value> = ENDPOINTS
                .iter()
                .map(|(route, description)| json!({ "route": route, "description": description }))
                .collect();

            Json(json!({
                "name": "FitGo Gateway",
                "version": env!("CARGO_PKG_VERSION"),
                "endpoints": endpoints
            }))
        }

        async fn health_handler() -> Json<Value> {
            Json(json!({
                "status": "healthy",
                "timestamp": chrono::Utc::now().to_rfc3339()
            }))
        }

        Router::new()
            .route("/", get(index_handler))
            .route("/health", get(health_handler))
    }
}
