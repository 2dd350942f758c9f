//! Realtime Core
//!
//! Presence tracking, call-room signaling and domain-event fan-out over
//! WebSocket connections.

pub mod dispatch;
pub mod events;
pub mod gateway;
pub mod handler;
pub mod presence;
pub mod rooms;

pub use dispatch::NotificationDispatcher;
pub use events::{ClientMessage, ServerEvent, SignalKind};
pub use gateway::{EventSender, Gateway};
pub use handler::ws_handler;
pub use presence::PresenceDirectory;
pub use rooms::{Departure, RoomRegistry};
