//! # Chat Realtime Server
//!
//! Standalone realtime gateway process. Initializes:
//! - Tracing/logging subsystem
//! - Configuration loading
//! - WebSocket gateway and HTTP server

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use chat_realtime::config::Settings;
use chat_realtime::domain::InMemoryParticipants;
use chat_realtime::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for structured logging
    chat_realtime::telemetry::init_tracing();

    info!("Starting Chat Realtime Server...");

    // Load configuration from environment and config files
    let settings = Settings::load()?;
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        "Configuration loaded"
    );

    // The standalone binary has no storage side; chat participants come from
    // an empty in-memory source. Embedding applications supply their own.
    let participants = Arc::new(InMemoryParticipants::new());

    // Build and run the application
    let application = Application::build(settings, participants).await?;

    info!("Server ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}
