//! Presence Directory
//!
//! Maps a logical identity to the set of currently open connections for that
//! identity. Every dispatch path resolves notification targets through this
//! single directory.

use dashmap::DashMap;

use crate::domain::{ConnectionId, Identity};

/// Identity → live connections, with a reverse index so disconnect cleanup is
/// O(1) instead of a scan over every identity.
///
/// Invariant: an identity key exists iff its connection set is non-empty.
#[derive(Debug, Default)]
pub struct PresenceDirectory {
    connections: DashMap<Identity, Vec<ConnectionId>>,
    index: DashMap<ConnectionId, Identity>,
}

impl PresenceDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection under an identity. Idempotent: registering the same
    /// pair twice leaves a single entry.
    pub fn register(&self, identity: Identity, connection: ConnectionId) {
        let mut set = self.connections.entry(identity.clone()).or_default();
        if !set.contains(&connection) {
            set.push(connection);
        }
        drop(set);
        self.index.insert(connection, identity);
    }

    /// Remove a connection wherever it is registered, deleting the identity
    /// key once its set empties. Unknown connections are a no-op.
    pub fn unregister(&self, connection: ConnectionId) {
        let Some((_, identity)) = self.index.remove(&connection) else {
            return;
        };
        if let Some(mut set) = self.connections.get_mut(&identity) {
            set.retain(|c| *c != connection);
            let emptied = set.is_empty();
            drop(set);
            if emptied {
                self.connections.remove_if(&identity, |_, set| set.is_empty());
            }
        }
    }

    /// Connections currently open for an identity. Empty means "offline",
    /// never an error.
    pub fn resolve(&self, identity: &str) -> Vec<ConnectionId> {
        self.connections
            .get(identity)
            .map(|set| set.value().clone())
            .unwrap_or_default()
    }

    /// Identity a connection registered under, if any.
    pub fn identity_of(&self, connection: ConnectionId) -> Option<Identity> {
        self.index.get(&connection).map(|i| i.value().clone())
    }

    pub fn is_online(&self, identity: &str) -> bool {
        self.connections
            .get(identity)
            .map(|set| !set.is_empty())
            .unwrap_or(false)
    }

    /// Number of identities with at least one open connection.
    pub fn identity_count(&self) -> usize {
        self.connections.len()
    }
}
