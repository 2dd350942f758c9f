//! Application Startup
//!
//! Application building and server initialization. The registries are
//! constructed here, owned by [`AppState`], and torn down with the process;
//! no presence or room state survives a restart.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::Settings;
use crate::domain::{EmailIdentityResolver, IdentityResolver, ParticipantSource};
use crate::http::{cors, health, routes};
use crate::realtime::{Gateway, NotificationDispatcher};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
    pub dispatcher: Arc<NotificationDispatcher>,
    pub resolver: Arc<dyn IdentityResolver>,
    pub settings: Arc<Settings>,
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings and the chat-participant
    /// collaborator the dispatcher resolves fan-out targets through.
    pub async fn build(
        settings: Settings,
        participants: Arc<dyn ParticipantSource>,
    ) -> Result<Self> {
        let gateway = Arc::new(Gateway::new());
        let dispatcher = Arc::new(NotificationDispatcher::new(gateway.clone(), participants));

        let state = AppState {
            gateway,
            dispatcher,
            resolver: Arc::new(EmailIdentityResolver),
            settings: Arc::new(settings.clone()),
        };

        health::init_server_start();

        // Build router with middleware
        let router = routes::create_router(state)
            .layer(TraceLayer::new_for_http())
            .layer(cors::create_cors_layer(&settings.cors));

        // Bind to address
        let addr = settings.server.socket_addr();
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Listening on {}", addr);

        Ok(Self { listener, router })
    }

    /// Run the server until stopped or interrupted
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}
