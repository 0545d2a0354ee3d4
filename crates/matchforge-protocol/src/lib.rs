//! Boundary types for Matchforge.
//!
//! This crate defines the values that cross the edge of the matchmaking
//! core:
//!
//! - **Identity** ([`PlayerId`], [`RoomId`]): the keys every registry
//!   lookup uses.
//! - **Responses** ([`JoinResponse`], [`CancelResponse`], [`PollResponse`],
//!   [`Snapshot`]): the logical results of the four boundary operations,
//!   serialized with the field names the polling clients expect.
//! - **Errors** ([`ProtocolError`]): input that is rejected before it can
//!   reach the core.
//!
//! # Architecture
//!
//! The protocol layer knows nothing about locks, pools or rooms. It only
//! guarantees that a value of a given type is well formed:
//!
//! ```text
//! HTTP adapter (strings) → Protocol (PlayerId, responses) → Core (pool, rooms)
//! ```

mod error;
mod types;

pub use error::ProtocolError;
pub use types::{
    CancelResponse, JoinResponse, PlayerId, PollResponse, RoomEntry, RoomId,
    Snapshot, Status, WaitingPlayerEntry,
};
