//! Room Registry
//!
//! Tracks which connections are joined to which call room, together with each
//! member's ephemeral peer state. Rooms are created lazily on first join and
//! dropped once their member set empties.
//!
//! Membership mutation and the member snapshot handed back to the caller
//! happen under one per-room lock, so concurrent joins and leaves on the same
//! room each observe a consistent member set.

use dashmap::DashMap;
use parking_lot::Mutex;

use crate::domain::{ConnectionId, PeerState, RoomId};

#[derive(Debug, Default)]
struct Room {
    /// Insertion-ordered members with their announced peer state.
    members: Vec<(ConnectionId, PeerState)>,
}

/// Members left behind after a connection departs a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub room: RoomId,
    pub remaining: Vec<ConnectionId>,
}

/// Room id → member set. A connection is in at most one room at a time;
/// the reverse index enforces that and makes leave-on-disconnect O(1).
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: DashMap<RoomId, Mutex<Room>>,
    index: DashMap<ConnectionId, RoomId>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection to a room with default peer state, returning the
    /// peers that were already present (with their current state) so the
    /// caller can replay them to the joiner before announcing it.
    ///
    /// A connection already in a room is not moved; the join is ignored and
    /// an empty snapshot returned.
    pub fn join(&self, room: &str, connection: ConnectionId) -> Vec<(ConnectionId, PeerState)> {
        if self.index.contains_key(&connection) {
            return Vec::new();
        }
        let entry = self
            .rooms
            .entry(room.to_string())
            .or_insert_with(|| Mutex::new(Room::default()));
        let peers = {
            let mut guard = entry.value().lock();
            let peers: Vec<_> = guard
                .members
                .iter()
                .map(|(id, state)| (*id, state.clone()))
                .collect();
            guard.members.push((connection, PeerState::default()));
            peers
        };
        drop(entry);
        self.index.insert(connection, room.to_string());
        peers
    }

    /// Remove a connection from its room, if it is in one, returning the room
    /// and a snapshot of the remaining members. Empty rooms are dropped.
    pub fn leave(&self, connection: ConnectionId) -> Option<Departure> {
        let (_, room_id) = self.index.remove(&connection)?;
        let mut remaining = Vec::new();
        let mut emptied = false;
        if let Some(room) = self.rooms.get(&room_id) {
            let mut guard = room.value().lock();
            guard.members.retain(|(id, _)| *id != connection);
            remaining = guard.members.iter().map(|(id, _)| *id).collect();
            emptied = guard.members.is_empty();
        }
        if emptied {
            self.rooms.remove_if(&room_id, |_, room| room.lock().members.is_empty());
        }
        Some(Departure {
            room: room_id,
            remaining,
        })
    }

    /// Overwrite a member's peer state (last write wins), returning its room
    /// and the other members to broadcast the change to. `None` when the
    /// connection is not in any room.
    pub fn set_peer_state(
        &self,
        connection: ConnectionId,
        state: PeerState,
    ) -> Option<(RoomId, Vec<ConnectionId>)> {
        let room_id = self.index.get(&connection)?.value().clone();
        let room = self.rooms.get(&room_id)?;
        let mut guard = room.value().lock();
        let mut found = false;
        let mut others = Vec::with_capacity(guard.members.len());
        for (id, member_state) in guard.members.iter_mut() {
            if *id == connection {
                *member_state = state.clone();
                found = true;
            } else {
                others.push(*id);
            }
        }
        drop(guard);
        found.then_some((room_id, others))
    }

    /// Room a connection is currently joined to, if any.
    pub fn room_of(&self, connection: ConnectionId) -> Option<RoomId> {
        self.index.get(&connection).map(|r| r.value().clone())
    }

    /// Current members of a room, in join order. Empty for unknown rooms.
    pub fn members(&self, room: &str) -> Vec<ConnectionId> {
        self.rooms
            .get(room)
            .map(|r| r.lock().members.iter().map(|(id, _)| *id).collect())
            .unwrap_or_default()
    }

    /// Announced peer state of one room member.
    pub fn peer_state(&self, room: &str, connection: ConnectionId) -> Option<PeerState> {
        self.rooms.get(room).and_then(|r| {
            r.lock()
                .members
                .iter()
                .find(|(id, _)| *id == connection)
                .map(|(_, state)| state.clone())
        })
    }

    /// Number of live (non-empty) rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
