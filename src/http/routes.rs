//! Route Configuration
//!
//! The HTTP surface owned by this process: the WebSocket gateway endpoint,
//! health probes and the Prometheus scrape target.

use axum::{response::IntoResponse, routing::get, Router};

use super::health;
use crate::realtime::ws_handler;
use crate::shared::{metrics, AppError};
use crate::startup::AppState;

/// Create the main router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // WebSocket gateway endpoint
        .route("/gateway", get(ws_handler))
        // Health check endpoints
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))
        .fallback(not_found)
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound("Route not found".into())
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    let metrics = metrics::gather_metrics();
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics,
    )
}
