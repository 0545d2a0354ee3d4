//! Identity and response types shared by the core and its adapters.
//!
//! Field names on the response types are part of the client contract:
//! polling clients read `status`, `playerID`, `opponentID` and `roomID`
//! exactly as spelled here.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A caller-supplied player identifier.
///
/// Players are anonymous: the id is whatever string the client chose when
/// it joined. The only rule is that it is not empty, and this newtype is
/// the single place that rule is enforced. Holding a `PlayerId` means the
/// check already passed.
///
/// Serde goes through `String` in both directions so that deserializing an
/// empty string fails the same way [`PlayerId::new`] does.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerId(String);

impl PlayerId {
    /// Validates and wraps a raw identifier.
    ///
    /// # Errors
    /// Returns [`ProtocolError::EmptyPlayerId`] for the empty string.
    pub fn new(raw: impl Into<String>) -> Result<Self, ProtocolError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(ProtocolError::EmptyPlayerId);
        }
        Ok(Self(raw))
    }

    /// Borrows the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlayerId {
    type Error = ProtocolError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl TryFrom<&str> for PlayerId {
    type Error = ProtocolError;

    fn try_from(raw: &str) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<PlayerId> for String {
    fn from(id: PlayerId) -> Self {
        id.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A generated room identifier.
///
/// Rooms are named by a random v4 UUID. `#[serde(transparent)]` makes the
/// JSON form the plain hyphenated string rather than `{ "0": ... }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub Uuid);

impl RoomId {
    /// Draws a fresh random room id.
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// The `status` field carried by every boundary response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// The player is in the pool (or was just added to it).
    Waiting,
    /// The player has been paired; the poll response carries the details.
    Matched,
    /// The player was removed on request.
    Cancelled,
}

/// Result of a join: the player is now waiting in the pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinResponse {
    pub status: Status,
    #[serde(rename = "playerID")]
    pub player_id: PlayerId,
}

impl JoinResponse {
    /// The only successful join outcome.
    pub fn waiting(player_id: PlayerId) -> Self {
        Self {
            status: Status::Waiting,
            player_id,
        }
    }
}

/// Result of a cancel. Cancellation always succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelResponse {
    pub status: Status,
}

impl CancelResponse {
    pub fn cancelled() -> Self {
        Self {
            status: Status::Cancelled,
        }
    }
}

/// Result of a status poll.
///
/// Internally tagged on `status`, so the two shapes on the wire are:
///
/// ```text
/// { "status": "matched", "opponentID": "B", "roomID": "5f0c…" }
/// { "status": "waiting" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PollResponse {
    /// The match result was consumed by this poll.
    Matched {
        #[serde(rename = "opponentID")]
        opponent_id: PlayerId,
        #[serde(rename = "roomID")]
        room_id: RoomId,
    },
    /// No match yet; poll again later.
    Waiting,
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// One waiting player as shown in a [`Snapshot`], in pool order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitingPlayerEntry {
    pub id: PlayerId,
    /// Wall-clock join time, milliseconds since the Unix epoch.
    pub joined_at_ms: u64,
    /// Time spent in the pool so far, measured on the monotonic clock.
    pub waiting_for_ms: u64,
}

/// One active room as shown in a [`Snapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomEntry {
    #[serde(rename = "roomID")]
    pub room_id: RoomId,
    pub players: [PlayerId; 2],
}

/// A point-in-time view of the whole matchmaker, for monitoring.
///
/// Produced while holding both state locks, so the counts and the lists
/// always agree with each other.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Players in the registry (waiting or matched-but-not-yet-polled).
    pub total_players: usize,
    /// Players still in the pool.
    pub waiting_players: usize,
    /// `total_players - waiting_players`.
    pub matched_players: usize,
    /// Rooms not yet pruned by cleanup.
    pub active_rooms: usize,
    pub waiting_players_list: Vec<WaitingPlayerEntry>,
    pub active_rooms_list: Vec<RoomEntry>,
}
