//! Error types for the room layer.

use matchforge_protocol::{PlayerId, RoomId};

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist.
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// A room with this id is already registered. The generated id
    /// collided; the registry was left unchanged.
    #[error("room id {0} already in use")]
    DuplicateId(RoomId),

    /// Both seats were given the same player.
    #[error("player {0} cannot be matched with itself")]
    SelfMatch(PlayerId),
}
