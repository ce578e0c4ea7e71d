// ABOUTME: COROS route handlers for login, activity summaries, listings and AI analysis
// ABOUTME: Thin axum handlers validating query parameters and delegating to shared resources
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! COROS routes
//!
//! Query validation happens here; everything else is delegated to the
//! session cache, aggregator and analyzer held by [`ServerResources`].

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use crate::errors::{AppError, AppResult};
use crate::resources::ServerResources;

/// Query parameters identifying one activity
#[derive(Debug, Deserialize, Default)]
struct ActivityQuery {
    #[serde(rename = "labelId", default)]
    label_id: Option<String>,
    #[serde(rename = "sportType", default)]
    sport_type: Option<String>,
}

impl ActivityQuery {
    fn require(&self) -> AppResult<(&str, &str)> {
        match (
            non_empty(self.label_id.as_deref()),
            non_empty(self.sport_type.as_deref()),
        ) {
            (Some(label_id), Some(sport_type)) => Ok((label_id, sport_type)),
            _ => Err(AppError::missing_field(
                "Both labelId and sportType are required",
            )),
        }
    }
}

/// Paging parameters for the activity list
#[derive(Debug, Deserialize, Default)]
struct ActivityListQuery {
    #[serde(default)]
    size: Option<String>,
    #[serde(rename = "pageNumber", default)]
    page_number: Option<String>,
}

impl ActivityListQuery {
    fn require(&self) -> AppResult<(i64, i64)> {
        Ok((
            parse_int("size", self.size.as_deref())?,
            parse_int("pageNumber", self.page_number.as_deref())?,
        ))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn parse_int(name: &str, raw: Option<&str>) -> AppResult<i64> {
    raw.unwrap_or_default()
        .trim()
        .parse()
        .map_err(|_| AppError::invalid_input(format!("{name} must be an integer")))
}

/// COROS routes
pub struct CorosRoutes;

impl CorosRoutes {
    /// Create all COROS routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/coros/login", get(Self::handle_login))
            .route("/coros/sports/summary", get(Self::handle_sports_summary))
            .route("/coros/active", get(Self::handle_activity_list))
            .route("/coros/ai/summary", get(Self::handle_ai_summary))
            .with_state(resources)
    }

    /// Ensure a valid session credential exists
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        resources.session.valid_token().await?;
        info!("COROS session ready");

        Ok((StatusCode::OK, "Login successful").into_response())
    }

    /// Split laps and summary for one activity
    async fn handle_sports_summary(
        State(resources): State<Arc<ServerResources>>,
        Query(params): Query<ActivityQuery>,
    ) -> Result<Response, AppError> {
        let (label_id, sport_type) = params.require()?;

        let result = resources
            .aggregator
            .fetch_summary(label_id, sport_type)
            .await?;

        Ok((StatusCode::OK, Json(result)).into_response())
    }

    /// One page of the upstream activity list, passed through unfiltered
    async fn handle_activity_list(
        State(resources): State<Arc<ServerResources>>,
        Query(params): Query<ActivityListQuery>,
    ) -> Result<Response, AppError> {
        let (size, page_number) = params.require()?;

        let page = resources
            .aggregator
            .fetch_activity_list(size, page_number)
            .await?;

        Ok((StatusCode::OK, Json(page)).into_response())
    }

    /// Narrative running analysis as plain text
    async fn handle_ai_summary(
        State(resources): State<Arc<ServerResources>>,
        Query(params): Query<ActivityQuery>,
    ) -> Result<Response, AppError> {
        let (label_id, sport_type) = params.require()?;

        let report = resources
            .analyzer()?
            .analyze(label_id, sport_type)
            .await?;

        Ok((
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            report,
        )
            .into_response())
    }
}
