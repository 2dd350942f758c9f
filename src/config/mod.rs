//! Configuration Management
//!
//! Layered settings loading: defaults, config files, environment variables.

mod settings;

pub use settings::{CorsSettings, ServerSettings, Settings, WebSocketSettings};
