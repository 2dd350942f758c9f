//! HTTP Surface
//!
//! Router, health probes and CORS configuration.

pub mod cors;
pub mod health;
pub mod routes;

pub use routes::create_router;
