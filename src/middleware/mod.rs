// ABOUTME: HTTP middleware for CORS and request tracing
// ABOUTME: Layers applied to every gateway route
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// CORS configuration
pub mod cors;
/// Request spans and IDs
pub mod tracing;

pub use self::cors::setup_cors;
pub use self::tracing::{new_request_id, request_trace_layer, RequestSpan};
