//! Room registry: tracks every room that has not yet been pruned.

use std::collections::HashMap;

use matchforge_protocol::RoomId;

use crate::{Room, RoomError};

/// All active rooms, keyed by id.
///
/// Not thread-safe by itself; the matchmaker keeps it behind its own lock,
/// always acquired after the player pool lock.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    /// Rooms plus the insertion sequence used to list them in creation order.
    rooms: HashMap<RoomId, (u64, Room)>,
    next_seq: u64,
}

impl RoomRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new room.
    ///
    /// # Errors
    /// [`RoomError::DuplicateId`] if the id is already taken. Nothing is
    /// changed in that case.
    pub fn insert(&mut self, room: Room) -> Result<(), RoomError> {
        let room_id = room.id();
        if self.rooms.contains_key(&room_id) {
            return Err(RoomError::DuplicateId(room_id));
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.rooms.insert(room_id, (seq, room));
        tracing::debug!(%room_id, active = self.rooms.len(), "room registered");
        Ok(())
    }

    pub fn get(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.get(room_id).map(|(_, room)| room)
    }

    pub fn contains(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }

    /// Removes a room.
    ///
    /// # Errors
    /// [`RoomError::NotFound`] if no such room is registered.
    pub fn remove(&mut self, room_id: &RoomId) -> Result<Room, RoomError> {
        self.rooms
            .remove(room_id)
            .map(|(_, room)| room)
            .ok_or(RoomError::NotFound(*room_id))
    }

    /// Removes every room `is_live` rejects and returns the removed ids.
    pub fn prune<F>(&mut self, mut is_live: F) -> Vec<RoomId>
    where
        F: FnMut(&Room) -> bool,
    {
        let mut pruned = Vec::new();
        self.rooms.retain(|room_id, (_, room)| {
            if is_live(room) {
                true
            } else {
                pruned.push(*room_id);
                false
            }
        });
        pruned
    }

    /// Rooms in creation order, oldest first.
    pub fn rooms(&self) -> Vec<&Room> {
        let mut ordered: Vec<&(u64, Room)> = self.rooms.values().collect();
        ordered.sort_by_key(|(seq, _)| *seq);
        ordered.into_iter().map(|(_, room)| room).collect()
    }

    /// Returns the number of active rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
