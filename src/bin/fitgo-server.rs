// ABOUTME: Gateway server binary serving the COROS and AI analysis HTTP API
// ABOUTME: Loads configuration, initializes logging and runs the axum server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # FitGo Gateway Server Binary
//!
//! Starts the HTTP gateway in front of the COROS team API.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use fitgo::{config::ServerConfig, logging, resources::ServerResources, routes};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "fitgo-server")]
#[command(about = "FitGo - COROS activity gateway with AI run analysis")]
pub struct Args {
    /// Override HTTP host
    #[arg(long)]
    host: Option<String>,

    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    logging::init_for_server(&config)?;

    if let Some(host) = args.host {
        config.http.host = host;
    }
    if let Some(http_port) = args.http_port {
        config.http.port = http_port;
    }

    info!("Starting FitGo gateway");
    info!("{}", config.summary());

    let bind_address = config.http.bind_address();
    let host = config.http.host.clone();
    let port = config.http.port;

    let resources = Arc::new(ServerResources::new(config)?);
    let app = routes::router(resources);

    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;

    display_available_endpoints(&host, port);
    info!("Ready to serve fitness data!");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("FitGo gateway stopped");
    Ok(())
}

/// Display all available API endpoints
#[allow(clippy::cognitive_complexity)]
fn display_available_endpoints(host: &str, port: u16) {
    info!("=== Available API Endpoints ===");
    info!("   Service Index:     GET http://{host}:{port}/");
    info!("   Health:            GET http://{host}:{port}/health");
    info!("   COROS Login:       GET http://{host}:{port}/coros/login");
    info!("   Sports Summary:    GET http://{host}:{port}/coros/sports/summary?labelId=&sportType=");
    info!("   Activity List:     GET http://{host}:{port}/coros/active?size=&pageNumber=");
    info!("   AI Summary:        GET http://{host}:{port}/coros/ai/summary?labelId=&sportType=");
    info!("=== End of Endpoint List ===");
}

/// Resolve when the process receives Ctrl+C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to install Ctrl+C handler: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
