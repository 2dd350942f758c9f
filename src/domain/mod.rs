//! Domain Types and Collaborator Contracts
//!
//! Core identifiers, per-room peer state, the record shapes carried by
//! notification events, and the trait seams through which the persistence
//! side of the application is consumed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(test)]
use mockall::automock;

/// Stable external key used to resolve notification targets
/// (account email or user id), independent of any single connection.
pub type Identity = String;

/// Ephemeral call/signaling session identifier.
pub type RoomId = String;

/// Persistent chat identifier, owned by the storage side.
pub type ChatId = String;

/// One live duplex channel. Assigned at connect time, never reused.
pub type ConnectionId = Uuid;

/// Per-connection, per-room ephemeral metadata visible to other room members.
///
/// Defaults to `enabled: false` until the peer announces otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerState {
    pub enabled: bool,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: String,
}

/// Public view of a user, safe to push to clients (no credentials).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub color: String,
}

/// Full invite record pushed on invite creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteRecord {
    pub id: String,
    pub chat: ChatId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_name: Option<String>,
    pub admin: UserSummary,
    pub created_at: DateTime<Utc>,
}

/// Message record pushed when a message is posted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
    pub id: String,
    pub chat: ChatId,
    pub user: UserSummary,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Resolves the participant identities of a chat.
///
/// Implemented by the chat storage service; this core only consumes it to
/// compute fan-out targets for chat-scoped events.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ParticipantSource: Send + Sync {
    async fn find_participants(&self, chat: &ChatId) -> Vec<Identity>;
}

/// Maps a raw connect-time query value to a canonical identity key.
pub trait IdentityResolver: Send + Sync {
    fn resolve(&self, raw: &str) -> Identity;
}

/// Default resolver: identities are email addresses, compared
/// case-insensitively and with surrounding whitespace stripped.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmailIdentityResolver;

impl IdentityResolver for EmailIdentityResolver {
    fn resolve(&self, raw: &str) -> Identity {
        raw.trim().to_ascii_lowercase()
    }
}

/// In-memory [`ParticipantSource`] used by tests and the standalone binary.
///
/// Production deployments embed the crate and supply a storage-backed
/// implementation instead.
#[derive(Debug, Default)]
pub struct InMemoryParticipants {
    chats: DashMap<ChatId, Vec<Identity>>,
}

impl InMemoryParticipants {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_participants(&self, chat: ChatId, participants: Vec<Identity>) {
        self.chats.insert(chat, participants);
    }
}

#[async_trait]
impl ParticipantSource for InMemoryParticipants {
    async fn find_participants(&self, chat: &ChatId) -> Vec<Identity> {
        self.chats
            .get(chat)
            .map(|p| p.value().clone())
            .unwrap_or_default()
    }
}
