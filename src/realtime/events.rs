//! Wire Message Types
//!
//! Tagged event formats exchanged over the realtime channel. Every frame is
//! JSON of the form `{"event": "...", "data": ...}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{ConnectionId, InviteRecord, MessageRecord, PeerState, UserSummary};

/// Signaling payload kinds relayed verbatim between two peers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Offer,
    Answer,
    Candidate,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::Offer => "offer",
            SignalKind::Answer => "answer",
            SignalKind::Candidate => "candidate",
        }
    }
}

/// Outbound server-to-client event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    // Call room membership
    #[serde(rename = "existing-user")]
    ExistingUser(ConnectionId),
    #[serde(rename = "user-connected")]
    UserConnected(ConnectionId),
    #[serde(rename = "user-disconnected")]
    UserDisconnected(ConnectionId),

    // Peer toggle state, sent both as the initial replay to a joiner and as
    // a room broadcast on update
    #[serde(rename = "toggle-video")]
    #[serde(rename_all = "camelCase")]
    ToggleVideo {
        user_id: ConnectionId,
        enabled: bool,
        #[serde(default)]
        name: String,
        #[serde(default)]
        color: String,
    },

    // Unicast signaling relays
    #[serde(rename = "offer")]
    Offer { payload: Value, from: ConnectionId },
    #[serde(rename = "answer")]
    Answer { payload: Value, from: ConnectionId },
    #[serde(rename = "candidate")]
    Candidate { payload: Value, from: ConnectionId },

    // Domain notifications
    #[serde(rename = "invite-created")]
    InviteCreated(InviteRecord),
    #[serde(rename = "enter-chat")]
    EnterChat { user: UserSummary },
    #[serde(rename = "message")]
    Message(MessageRecord),
    #[serde(rename = "email-validated")]
    EmailValidated {},
}

impl ServerEvent {
    /// Event name as it appears on the wire, used for logging and metrics.
    pub fn event_name(&self) -> &'static str {
        match self {
            ServerEvent::ExistingUser(_) => "existing-user",
            ServerEvent::UserConnected(_) => "user-connected",
            ServerEvent::UserDisconnected(_) => "user-disconnected",
            ServerEvent::ToggleVideo { .. } => "toggle-video",
            ServerEvent::Offer { .. } => "offer",
            ServerEvent::Answer { .. } => "answer",
            ServerEvent::Candidate { .. } => "candidate",
            ServerEvent::InviteCreated(_) => "invite-created",
            ServerEvent::EnterChat { .. } => "enter-chat",
            ServerEvent::Message(_) => "message",
            ServerEvent::EmailValidated {} => "email-validated",
        }
    }

    /// Build a relay event carrying an opaque negotiation payload.
    pub fn signal(kind: SignalKind, payload: Value, from: ConnectionId) -> Self {
        match kind {
            SignalKind::Offer => ServerEvent::Offer { payload, from },
            SignalKind::Answer => ServerEvent::Answer { payload, from },
            SignalKind::Candidate => ServerEvent::Candidate { payload, from },
        }
    }

    /// Build a toggle notice from a member's announced peer state.
    pub fn toggle(user_id: ConnectionId, state: PeerState) -> Self {
        ServerEvent::ToggleVideo {
            user_id,
            enabled: state.enabled,
            name: state.name,
            color: state.color,
        }
    }
}

/// Inbound client-to-server message on the signaling/presence channel.
///
/// Malformed frames are rejected at the transport boundary and never reach
/// the registries.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientMessage {
    #[serde(rename = "offer")]
    Offer { payload: Value, to: ConnectionId },
    #[serde(rename = "answer")]
    Answer { payload: Value, to: ConnectionId },
    #[serde(rename = "candidate")]
    Candidate { payload: Value, to: ConnectionId },
    #[serde(rename = "toggle-video")]
    ToggleVideo(PeerState),
}
