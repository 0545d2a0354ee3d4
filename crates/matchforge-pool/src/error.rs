//! Error types for the pool layer.

use matchforge_protocol::PlayerId;

/// Errors that can occur while operating on the player pool.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    /// No player with this id is registered.
    ///
    /// Covers both "never joined" and "already reaped by a successful
    /// poll"; the two are deliberately indistinguishable.
    #[error("player {0} not found")]
    NotFound(PlayerId),

    /// A player with this id is already registered and the rejoin policy
    /// rejects duplicates.
    #[error("player {0} already exists")]
    AlreadyExists(PlayerId),

    /// The player's result slot was written before. Each slot accepts
    /// exactly one match outcome.
    #[error("result slot for player {0} already filled")]
    SlotAlreadyFilled(PlayerId),
}
