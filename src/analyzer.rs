// ABOUTME: Running activity analyzer turning aggregated COROS data into an AI report
// ABOUTME: Embeds split laps and the summary in the analysis prompt and returns the model's reply
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::coros::{ActivityAggregator, AggregatedResult};
use crate::errors::{AppError, AppResult};
use crate::llm::prompts::render_running_analysis;
use crate::llm::{ChatMessage, LlmProvider};

/// Narrative analysis of one running activity
pub struct RunningAnalyzer {
    aggregator: Arc<ActivityAggregator>,
    chat: Arc<dyn LlmProvider>,
}

impl RunningAnalyzer {
    /// Create an analyzer over the shared aggregator and chat backend
    #[must_use]
    pub fn new(aggregator: Arc<ActivityAggregator>, chat: Arc<dyn LlmProvider>) -> Self {
        Self { aggregator, chat }
    }

    /// Render the analysis prompt for an aggregated activity
    ///
    /// # Errors
    ///
    /// Returns an internal error if the activity cannot be encoded.
    pub fn build_prompt(result: &AggregatedResult) -> AppResult<String> {
        let laps = serde_json::to_string(&result.lap_list)
            .map_err(|e| AppError::internal(format!("Failed to encode laps: {e}")))?;
        let summary = serde_json::to_string(&result.summary)
            .map_err(|e| AppError::internal(format!("Failed to encode summary: {e}")))?;

        Ok(render_running_analysis(&laps, &summary))
    }

    /// Fetch the activity and return the model's Markdown report
    ///
    /// # Errors
    ///
    /// Propagates aggregator errors and chat backend errors unchanged.
    #[instrument(skip(self), fields(provider = self.chat.name()))]
    pub async fn analyze(&self, label_id: &str, sport_type: &str) -> AppResult<String> {
        let activity = self.aggregator.fetch_summary(label_id, sport_type).await?;
        let prompt = Self::build_prompt(&activity)?;

        info!(
            laps = activity.lap_list.len(),
            "Requesting running analysis from {}",
            self.chat.display_name()
        );

        let reply = self.chat.complete(&[ChatMessage::user(prompt)]).await?;
        debug!(model = %reply.model, chars = reply.text.len(), "Analysis received");

        Ok(reply.text)
    }
}
