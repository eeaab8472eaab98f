//! # wifiqr-server
//!
//! HTTP server for wifiqr.
//!
//! This binary provides:
//! - REST API for storing Wi-Fi networks and downloading their QR codes
//! - OpenAPI document at `/api/openapi.json`
//! - Structured logging to file and stdout
//!
//! ## Running
//!
//! ```bash
//! # Development
//! cargo run --package wifiqr-server
//!
//! # With a config file
//! WIFIQR_CONFIG=./config.toml ./wifiqr-server
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use tokio::net::TcpListener;
use tracing::info;
use wifiqr_core::Config;
use wifiqr_server::api::create_router;
use wifiqr_server::logging;
use wifiqr_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    logging::init(&config.logging)?;

    info!("Starting wifiqr-server");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config).await?;
    let app = create_router(state);

    let listener = TcpListener::bind(&addr).await?;

    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
