// ABOUTME: COROS upstream integration: client, session cache and activity aggregation
// ABOUTME: Re-exports the types used by routes and the analyzer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # COROS Integration
//!
//! Layers, leaf first:
//!
//! - [`client`]: the `CorosTransport` seam and its reqwest implementation
//! - [`envelope`]: the `{result, message, data}` wrapper every reply uses
//! - [`session`]: the single shared credential
//! - [`laps`]: split-lap filtering over the loosely typed lap tree
//! - [`aggregator`]: detail and listing operations

pub mod aggregator;
pub mod client;
pub mod envelope;
pub mod laps;
pub mod session;

pub use aggregator::{ActivityAggregator, AggregatedResult};
pub use client::{CorosTransport, HttpCorosClient, UpstreamRequest};
pub use envelope::{Envelope, JsonMap};
pub use laps::{filter_split_laps, NormalizedLap, RawLapNode};
pub use session::{Clock, Credential, SessionCache, SystemClock};
