// ABOUTME: Activity aggregation over the COROS upstream
// ABOUTME: Fetches activity detail and listings with the shared session credential
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::client::{CorosTransport, UpstreamRequest};
use super::envelope::{Envelope, JsonMap};
use super::laps::{decode_lap_list, filter_split_laps, NormalizedLap};
use super::session::SessionCache;
use crate::constants::coros;
use crate::errors::{AppError, AppResult};

/// Split laps plus the activity summary for one activity
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregatedResult {
    /// Per-kilometre split entries in upstream order
    #[serde(rename = "lapList")]
    pub lap_list: Vec<NormalizedLap>,
    /// Activity summary lifted unchanged from the upstream payload
    pub summary: JsonMap,
}

impl AggregatedResult {
    /// Build the result from a detail payload's `data` object
    #[must_use]
    pub fn from_detail(data: &JsonMap) -> Self {
        let nodes = decode_lap_list(data.get("lapList"));
        Self {
            lap_list: filter_split_laps(&nodes),
            summary: data
                .get("summary")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default(),
        }
    }
}

/// Upstream activity operations behind the session cache
pub struct ActivityAggregator {
    transport: Arc<dyn CorosTransport>,
    session: Arc<SessionCache>,
}

impl ActivityAggregator {
    /// Create an aggregator sharing `session`'s credential
    #[must_use]
    pub fn new(transport: Arc<dyn CorosTransport>, session: Arc<SessionCache>) -> Self {
        Self { transport, session }
    }

    /// Session cache backing this aggregator
    #[must_use]
    pub fn session(&self) -> &SessionCache {
        &self.session
    }

    /// Fetch one activity's split laps and summary
    ///
    /// # Errors
    ///
    /// Credential errors are propagated unchanged. A non-success envelope is
    /// an `ExternalServiceError` carrying the upstream message; a malformed
    /// body is a `SerializationError`.
    #[instrument(skip(self))]
    pub async fn fetch_summary(
        &self,
        label_id: &str,
        sport_type: &str,
    ) -> AppResult<AggregatedResult> {
        let token = self.session.valid_token().await?;

        let request = UpstreamRequest::post(coros::endpoints::ACTIVITY_DETAIL)
            .with_credential(token)
            .with_query("screenW", coros::SCREEN_WIDTH)
            .with_query("screenH", coros::SCREEN_HEIGHT)
            .with_query("labelId", label_id)
            .with_query("sportType", sport_type);

        let raw = self.transport.send(request).await?;
        let envelope: Envelope<Value> = Envelope::parse(&raw)?;

        if !envelope.is_success() {
            warn!(result = %envelope.result, "COROS activity detail query failed");
            return Err(AppError::external_service(
                coros::SERVICE,
                format!("activity detail query failed: {}", envelope.message),
            ));
        }

        let result = envelope
            .data
            .as_ref()
            .and_then(Value::as_object)
            .map(AggregatedResult::from_detail)
            .unwrap_or_default();

        debug!(
            laps = result.lap_list.len(),
            summary_fields = result.summary.len(),
            "Aggregated COROS activity detail"
        );

        Ok(result)
    }

    /// Fetch a page of the activity listing, returned as the raw envelope
    ///
    /// The business status is not inspected; callers read `result` themselves.
    ///
    /// # Errors
    ///
    /// Credential and transport errors, or `SerializationError` when the body
    /// is not a JSON object.
    #[instrument(skip(self))]
    pub async fn fetch_activity_list(&self, size: i64, page_number: i64) -> AppResult<JsonMap> {
        let token = self.session.valid_token().await?;

        let request = UpstreamRequest::get(coros::endpoints::ACTIVITY_LIST)
            .with_credential(token)
            .with_query("size", size.to_string())
            .with_query("pageNumber", page_number.to_string())
            .with_query("modeList", "");

        let raw = self.transport.send(request).await?;

        serde_json::from_str(&raw).map_err(|e| {
            AppError::decode(coros::SERVICE, format!("Malformed activity list: {e}"))
        })
    }
}
