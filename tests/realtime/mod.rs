//! Realtime Scenarios
//!
//! End-to-end presence, room and fan-out behavior driven through the gateway
//! and dispatcher with fake connections.

mod room_tests;
