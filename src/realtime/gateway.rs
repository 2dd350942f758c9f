//! Realtime Gateway
//!
//! The process-wide registry tying connection lifecycle to the presence
//! directory and room registry, and the single place events are handed to a
//! connection. The transport registers an outbound channel per connection;
//! everything above it calls [`Gateway::deliver`] and never assumes
//! synchronous delivery.

use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::mpsc;

use super::events::{ClientMessage, ServerEvent, SignalKind};
use super::presence::PresenceDirectory;
use super::rooms::RoomRegistry;
use crate::domain::{ConnectionId, Identity, PeerState};
use crate::shared::metrics;

/// Outbound channel handed over by the transport at connect time.
pub type EventSender = mpsc::UnboundedSender<ServerEvent>;

/// Realtime connection registry.
///
/// Constructed once at process start, held in application state, torn down
/// with the process. All presence and room state is rebuilt purely from new
/// connection events after a restart.
pub struct Gateway {
    connections: DashMap<ConnectionId, EventSender>,
    presence: PresenceDirectory,
    rooms: RoomRegistry,
}

impl Gateway {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            presence: PresenceDirectory::new(),
            rooms: RoomRegistry::new(),
        }
    }

    /// Register a freshly opened connection.
    ///
    /// Either query value may be absent: a connection without an identity is
    /// anonymous and unaddressable by notifications, one without a room never
    /// takes part in signaling. Both still hold a live channel.
    ///
    /// When a room is given, the joiner first learns every already-present
    /// peer (`existing-user` plus that peer's current toggle state) and only
    /// then is announced to the others with `user-connected`. Peers therefore
    /// never hear about a member whose state they could not have seen.
    pub fn on_connect(
        &self,
        connection: ConnectionId,
        identity: Option<Identity>,
        room: Option<&str>,
        sender: EventSender,
    ) {
        self.connections.insert(connection, sender);
        metrics::CONNECTIONS_ACTIVE.set(self.connections.len() as i64);

        if let Some(identity) = identity {
            self.presence.register(identity.clone(), connection);
            tracing::info!(connection = %connection, identity = %identity, "connection registered");
        } else {
            tracing::debug!(connection = %connection, "anonymous connection, presence not registered");
        }

        if let Some(room) = room {
            let peers = self.rooms.join(room, connection);
            metrics::ROOMS_ACTIVE.set(self.rooms.room_count() as i64);
            for (peer, state) in &peers {
                self.deliver(connection, ServerEvent::ExistingUser(*peer));
                self.deliver(connection, ServerEvent::toggle(*peer, state.clone()));
            }
            for (peer, _) in &peers {
                self.deliver(*peer, ServerEvent::UserConnected(connection));
            }
            tracing::debug!(
                connection = %connection,
                room = %room,
                peers = peers.len(),
                "connection joined room"
            );
        }
    }

    /// Tear down a closed connection.
    ///
    /// The outbound channel is dropped first, so no event can reach the
    /// connection once its disconnect handling has started; presence and room
    /// cleanup follow, and the remaining room members are told.
    pub fn on_disconnect(&self, connection: ConnectionId) {
        self.connections.remove(&connection);
        metrics::CONNECTIONS_ACTIVE.set(self.connections.len() as i64);

        self.presence.unregister(connection);

        if let Some(departure) = self.rooms.leave(connection) {
            metrics::ROOMS_ACTIVE.set(self.rooms.room_count() as i64);
            for peer in departure.remaining {
                self.deliver(peer, ServerEvent::UserDisconnected(connection));
            }
            tracing::debug!(connection = %connection, room = %departure.room, "connection left room");
        }

        tracing::info!(connection = %connection, "connection closed");
    }

    /// Route one inbound client frame.
    pub fn handle_message(&self, from: ConnectionId, message: ClientMessage) {
        match message {
            ClientMessage::Offer { payload, to } => self.relay(SignalKind::Offer, from, to, payload),
            ClientMessage::Answer { payload, to } => {
                self.relay(SignalKind::Answer, from, to, payload)
            }
            ClientMessage::Candidate { payload, to } => {
                self.relay(SignalKind::Candidate, from, to, payload)
            }
            ClientMessage::ToggleVideo(state) => self.update_peer_state(from, state),
        }
    }

    /// Unicast an opaque negotiation payload to one target connection.
    ///
    /// A vanished target drops the message silently; the negotiation protocol
    /// above times out and retries on its own.
    pub fn relay(&self, kind: SignalKind, from: ConnectionId, to: ConnectionId, payload: Value) {
        if !self.deliver(to, ServerEvent::signal(kind, payload, from)) {
            tracing::debug!(
                kind = kind.as_str(),
                from = %from,
                to = %to,
                "relay target gone, dropping"
            );
        }
    }

    /// Overwrite a member's toggle state and broadcast it to the rest of its
    /// room. Last write wins; a connection outside any room is a no-op.
    pub fn update_peer_state(&self, connection: ConnectionId, state: PeerState) {
        if let Some((_, others)) = self.rooms.set_peer_state(connection, state.clone()) {
            for peer in others {
                self.deliver(peer, ServerEvent::toggle(connection, state.clone()));
            }
        }
    }

    /// Hand one event to one connection. Returns whether a live channel was
    /// found; a missing or closed channel is normal churn, never an error.
    pub fn deliver(&self, connection: ConnectionId, event: ServerEvent) -> bool {
        let delivered = self
            .connections
            .get(&connection)
            .map(|sender| sender.send(event).is_ok())
            .unwrap_or(false);
        if delivered {
            metrics::EVENTS_DELIVERED.with_label_values(&["delivered"]).inc();
        } else {
            metrics::EVENTS_DELIVERED.with_label_values(&["dropped"]).inc();
        }
        delivered
    }

    /// Deliver one event to every open connection of an identity.
    /// Returns the number of connections reached.
    pub fn send_to_identity(&self, identity: &str, event: &ServerEvent) -> usize {
        let mut reached = 0;
        for connection in self.presence.resolve(identity) {
            if self.deliver(connection, event.clone()) {
                reached += 1;
            }
        }
        reached
    }

    pub fn presence(&self) -> &PresenceDirectory {
        &self.presence
    }

    pub fn rooms(&self) -> &RoomRegistry {
        &self.rooms
    }

    /// Number of open connections, addressable or not.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

impl Default for Gateway {
    fn default() -> Self {
        Self::new()
    }
}
