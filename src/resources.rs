// ABOUTME: Shared server resources built once at startup
// ABOUTME: Holds configuration, the COROS session/aggregator and the optional chat analyzer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use tracing::{info, warn};

use crate::analyzer::RunningAnalyzer;
use crate::config::ServerConfig;
use crate::coros::{
    ActivityAggregator, Clock, CorosTransport, HttpCorosClient, SessionCache, SystemClock,
};
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::llm::{ChatProvider, LlmProvider};

/// Why the chat backend is not available
#[derive(Debug, Clone)]
struct ChatUnavailable {
    code: ErrorCode,
    message: String,
}

/// Everything request handlers need, shared through `Arc`
pub struct ServerResources {
    /// Loaded configuration
    pub config: Arc<ServerConfig>,
    /// Shared COROS credential
    pub session: Arc<SessionCache>,
    /// COROS activity operations
    pub aggregator: Arc<ActivityAggregator>,
    analyzer: Option<Arc<RunningAnalyzer>>,
    chat_unavailable: Option<ChatUnavailable>,
}

impl ServerResources {
    /// Build resources against the real upstream and configured chat backend
    ///
    /// A chat backend that cannot be configured does not prevent startup;
    /// only the AI analysis route reports the problem.
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` when the COROS base URL is invalid.
    pub fn new(config: ServerConfig) -> AppResult<Self> {
        let transport: Arc<dyn CorosTransport> = Arc::new(HttpCorosClient::new(&config.coros)?);

        let chat = match ChatProvider::from_config(&config.llm) {
            Ok(provider) => {
                info!(
                    "Chat backend ready: {} ({})",
                    provider.display_name(),
                    provider.default_model()
                );
                Ok(Arc::new(provider) as Arc<dyn LlmProvider>)
            }
            Err(e) => {
                warn!("Chat backend unavailable, AI analysis disabled: {}", e.message);
                Err(e)
            }
        };

        Ok(Self::with_components(config, transport, Arc::new(SystemClock), chat))
    }

    /// Assemble resources from explicit components
    #[must_use]
    pub fn with_components(
        config: ServerConfig,
        transport: Arc<dyn CorosTransport>,
        clock: Arc<dyn Clock>,
        chat: AppResult<Arc<dyn LlmProvider>>,
    ) -> Self {
        let session = Arc::new(SessionCache::new(
            Arc::clone(&transport),
            clock,
            config.coros.clone(),
        ));
        let aggregator = Arc::new(ActivityAggregator::new(transport, Arc::clone(&session)));

        let (analyzer, chat_unavailable) = match chat {
            Ok(provider) => (
                Some(Arc::new(RunningAnalyzer::new(Arc::clone(&aggregator), provider))),
                None,
            ),
            Err(e) => (
                None,
                Some(ChatUnavailable {
                    code: e.code,
                    message: e.message,
                }),
            ),
        };

        Self {
            config: Arc::new(config),
            session,
            aggregator,
            analyzer,
            chat_unavailable,
        }
    }

    /// The running analyzer, or the configuration error that disabled it
    ///
    /// # Errors
    ///
    /// Returns the chat backend's configuration error when it could not be built.
    pub fn analyzer(&self) -> AppResult<&RunningAnalyzer> {
        self.analyzer.as_deref().ok_or_else(|| {
            self.chat_unavailable.as_ref().map_or_else(
                || AppError::config("Chat backend is not configured"),
                |reason| AppError::new(reason.code, reason.message.clone()),
            )
        })
    }
}
