//! HTTP and WebSocket Endpoint Tests

mod gateway_tests;
mod health_tests;
