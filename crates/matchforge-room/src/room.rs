//! The room record.

use std::time::Instant;

use matchforge_protocol::{PlayerId, RoomEntry, RoomId};

use crate::RoomError;

/// One pairing of exactly two distinct players.
///
/// Members are fixed at construction; there are no setters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    id: RoomId,
    players: [PlayerId; 2],
    created_at: Instant,
}

impl Room {
    /// Builds a room for two players.
    ///
    /// # Errors
    /// [`RoomError::SelfMatch`] if both seats hold the same id.
    pub fn new(id: RoomId, first: PlayerId, second: PlayerId) -> Result<Self, RoomError> {
        if first == second {
            return Err(RoomError::SelfMatch(first));
        }
        Ok(Self {
            id,
            players: [first, second],
            created_at: Instant::now(),
        })
    }

    pub fn id(&self) -> RoomId {
        self.id
    }

    /// Both members, in the order they left the pool.
    pub fn players(&self) -> &[PlayerId; 2] {
        &self.players
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// `true` if `player` holds one of the two seats.
    pub fn has_player(&self, player: &PlayerId) -> bool {
        self.players.contains(player)
    }

    /// The other member, or `None` if `player` is not in this room.
    pub fn opponent_of(&self, player: &PlayerId) -> Option<&PlayerId> {
        match &self.players {
            [a, b] if a == player => Some(b),
            [a, b] if b == player => Some(a),
            _ => None,
        }
    }

    /// Monitoring view of this room.
    pub fn entry(&self) -> RoomEntry {
        RoomEntry {
            room_id: self.id,
            players: self.players.clone(),
        }
    }
}
