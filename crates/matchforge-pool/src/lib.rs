//! Player registry and waiting pool for Matchforge.
//!
//! This crate owns the first of the two protected regions of the
//! matchmaker: every player that has joined and not yet been reaped, plus
//! the FIFO queue of those still waiting for an opponent.
//!
//! 1. **Registry**: the source of truth for "does this id still exist"
//! 2. **Pool**: arrival-ordered ids of players not yet matched
//! 3. **Result slots**: one per player, written once by the pairing step
//!    and consumed once by a poll ([`ResultSlot`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Matchmaker (above)  ← locks this region first, then the room registry
//!     ↕
//! Pool layer (this crate)  ← player lifetime, queue order, match delivery
//!     ↕
//! Protocol layer (below)  ← PlayerId, RoomId
//! ```
//!
//! [`PlayerPool`] is not thread-safe by itself; the matchmaker wraps it in
//! a mutex and keeps registry and queue under that one lock so they can
//! never disagree.

mod error;
mod player;
mod pool;

pub use error::PoolError;
pub use player::{MatchOutcome, Player, ResultSlot};
pub use pool::{PlayerPool, PollOutcome, RejoinPolicy};
