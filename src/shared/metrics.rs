//! Prometheus Metrics
//!
//! Application-wide metrics collection.
//!
//! # Metrics Collected
//! - Active WebSocket connection gauge
//! - Live (non-empty) room gauge
//! - Event delivery counters by outcome (delivered vs. dropped on churn)

use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Active WebSocket connections gauge
pub static CONNECTIONS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::with_opts(
        Opts::new("connections_active", "Number of open WebSocket connections")
            .namespace("chat_realtime"),
    )
    .expect("Failed to create CONNECTIONS_ACTIVE metric")
});

/// Live call rooms gauge
pub static ROOMS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::with_opts(
        Opts::new("rooms_active", "Number of non-empty call rooms").namespace("chat_realtime"),
    )
    .expect("Failed to create ROOMS_ACTIVE metric")
});

/// Event delivery counter, labelled by outcome.
///
/// "dropped" counts delivery attempts to vanished connections, which is
/// normal connection churn and never an application error.
pub static EVENTS_DELIVERED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("events_total", "Total event delivery attempts").namespace("chat_realtime"),
        &["outcome"],
    )
    .expect("Failed to create EVENTS_DELIVERED metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(CONNECTIONS_ACTIVE.clone()))
        .expect("Failed to register CONNECTIONS_ACTIVE");
    registry
        .register(Box::new(ROOMS_ACTIVE.clone()))
        .expect("Failed to register ROOMS_ACTIVE");
    registry
        .register(Box::new(EVENTS_DELIVERED.clone()))
        .expect("Failed to register EVENTS_DELIVERED");
}

/// Encode all registered metrics in Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
