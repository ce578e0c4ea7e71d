// ABOUTME: Main library entry point for the FitGo fitness gateway
// ABOUTME: COROS session caching, activity aggregation and AI run analysis over HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # FitGo Gateway
//!
//! A backend gateway that aggregates activity data from the COROS cloud API,
//! optionally summarizes it through a pluggable LLM chat backend, and exposes
//! both over a small HTTP surface.
//!
//! ## Architecture
//!
//! - **COROS**: upstream client, shared session credential, lap filtering
//! - **LLM**: chat backend trait with Qwen and Gemini implementations
//! - **Analyzer**: running-activity report built on the two
//! - **Routes**: axum routers with CORS, tracing and timeouts

/// Running activity analysis through the chat backend
pub mod analyzer;

/// Configuration management
pub mod config;

/// Application constants grouped by domain
pub mod constants;

/// COROS upstream integration
pub mod coros;

/// Unified error handling
pub mod errors;

/// Chat backend abstraction and providers
pub mod llm;

/// Logging configuration and structured logging setup
pub mod logging;

/// HTTP middleware (CORS, request tracing)
pub mod middleware;

/// Shared server resources
pub mod resources;

/// HTTP route handlers
pub mod routes;

/// Shared utilities
pub mod utils;
