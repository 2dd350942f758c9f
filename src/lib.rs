//! # Chat Realtime
//!
//! This crate provides the realtime notification and signaling core of a
//! multi-user chat application:
//! - Presence tracking: which open connections belong to which identity
//! - Call rooms: WebRTC signaling relay and ephemeral per-peer toggle state
//! - Notification fan-out: domain events pushed to every device of the
//!   affected identities
//!
//! Persistence, validation, authentication and email delivery are external
//! collaborators, consumed through the traits in [`domain`].
//!
//! ## Module Structure
//!
//! ```text
//! chat_realtime/
//! +-- config/    Configuration management
//! +-- domain/    Core types and collaborator traits
//! +-- realtime/  Presence directory, room registry, relay, dispatcher
//! +-- http/      Router, health probes, CORS
//! +-- shared/    Common utilities (errors, metrics)
//! ```

// Configuration module
pub mod config;

// Core types and collaborator contracts
pub mod domain;

// Realtime core: presence, rooms, signaling, fan-out
pub mod realtime;

// HTTP surface
pub mod http;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
