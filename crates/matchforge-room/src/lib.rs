//! Room registry for Matchforge.
//!
//! A room is the record of one pairing: a generated id and the two player
//! ids that were at the front of the pool together. Rooms are created by
//! the pairing step and removed by the cleanup pass once their players are
//! gone from the player registry.
//!
//! # Key types
//!
//! - [`Room`]: an immutable two-player pairing record
//! - [`RoomRegistry`]: the second protected region of the matchmaker
//! - [`RoomError`]: collisions and missing rooms

mod error;
mod registry;
mod room;

pub use error::RoomError;
pub use registry::RoomRegistry;
pub use room::Room;
