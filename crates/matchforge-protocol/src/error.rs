//! Error types for the protocol layer.
//!
//! Each Matchforge crate owns its own error enum. A `ProtocolError` always
//! means the caller sent something malformed; it never describes the state
//! of the pool or the rooms.

/// Errors raised while turning raw input into protocol types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// A player identifier was empty.
    ///
    /// Every lookup in the core is keyed by the player id, so an empty
    /// string can never address a player.
    #[error("player id is required")]
    EmptyPlayerId,
}
