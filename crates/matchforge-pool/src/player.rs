//! Player records and their one-shot result slots.
//!
//! A `Player` is the registry's record of one anonymous client:
//! - WHO it is (`PlayerId`)
//! - WHEN it joined (monotonic and wall-clock)
//! - WHETHER it has been paired, and into WHICH room
//! - the slot through which the pairing step hands it its opponent

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use matchforge_protocol::{PlayerId, RoomId};

// ---------------------------------------------------------------------------
// MatchOutcome
// ---------------------------------------------------------------------------

/// What a player learns when it is paired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    pub opponent_id: PlayerId,
    pub room_id: RoomId,
}

// ---------------------------------------------------------------------------
// ResultSlot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum SlotState {
    #[default]
    Empty,
    Filled(MatchOutcome),
    Consumed,
}

/// A capacity-one, single-writer/single-reader delivery slot.
///
/// This is the bridge between the background pairing step and a poll
/// request. The state machine only moves forward:
///
/// ```text
///   Empty ──(deliver)──→ Filled ──(take)──→ Consumed
/// ```
///
/// - [`deliver`](Self::deliver) never blocks and succeeds at most once.
/// - [`peek`](Self::peek) is non-consuming; it returns the same outcome
///   every time until the slot is taken.
/// - [`take`](Self::take) is consuming; it returns `Some` exactly once over
///   the life of the slot.
///
/// Mutation requires `&mut self`, so two concurrent takes that both observe
/// `Filled` are ruled out by the borrow checker plus the pool lock that owns
/// the player.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSlot {
    state: SlotState,
}

impl ResultSlot {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes the outcome into the slot.
    ///
    /// # Errors
    /// Hands the outcome back if the slot was already written (filled or
    /// consumed).
    pub fn deliver(&mut self, outcome: MatchOutcome) -> Result<(), MatchOutcome> {
        match self.state {
            SlotState::Empty => {
                self.state = SlotState::Filled(outcome);
                Ok(())
            }
            SlotState::Filled(_) | SlotState::Consumed => Err(outcome),
        }
    }

    /// Non-consuming inspection.
    pub fn peek(&self) -> Option<&MatchOutcome> {
        match &self.state {
            SlotState::Filled(outcome) => Some(outcome),
            SlotState::Empty | SlotState::Consumed => None,
        }
    }

    /// Consumes the outcome, if one is waiting.
    pub fn take(&mut self) -> Option<MatchOutcome> {
        match std::mem::take(&mut self.state) {
            SlotState::Filled(outcome) => {
                self.state = SlotState::Consumed;
                Some(outcome)
            }
            SlotState::Consumed => {
                self.state = SlotState::Consumed;
                None
            }
            SlotState::Empty => None,
        }
    }

    /// `true` once [`deliver`](Self::deliver) has succeeded, even after
    /// the outcome was taken.
    pub fn is_written(&self) -> bool {
        !matches!(self.state, SlotState::Empty)
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// A registered player.
///
/// Match fields (`matched`, `room_id`, the slot contents) are written once,
/// by the pairing step, through [`PlayerPool`](crate::PlayerPool). Outside
/// this crate they are read-only.
#[derive(Debug, Clone)]
pub struct Player {
    id: PlayerId,
    matched: bool,
    joined_at: Instant,
    joined_wall: SystemTime,
    room_id: Option<RoomId>,
    slot: ResultSlot,
}

impl Player {
    pub(crate) fn new(id: PlayerId) -> Self {
        Self {
            id,
            matched: false,
            joined_at: Instant::now(),
            joined_wall: SystemTime::now(),
            room_id: None,
            slot: ResultSlot::new(),
        }
    }

    pub fn id(&self) -> &PlayerId {
        &self.id
    }

    /// `true` once the pairing step has placed this player in a room.
    pub fn is_matched(&self) -> bool {
        self.matched
    }

    /// The room this player was paired into, if any.
    pub fn room_id(&self) -> Option<RoomId> {
        self.room_id
    }

    /// Monotonic join instant.
    pub fn joined_at(&self) -> Instant {
        self.joined_at
    }

    /// Wall-clock join time in milliseconds since the Unix epoch. Display only.
    pub fn joined_at_unix_ms(&self) -> u64 {
        self.joined_wall
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    /// How long this player has existed.
    pub fn waited(&self) -> Duration {
        self.joined_at.elapsed()
    }

    pub fn slot(&self) -> &ResultSlot {
        &self.slot
    }

    /// Marks the player matched and delivers the outcome into its slot.
    pub(crate) fn record_match(&mut self, outcome: MatchOutcome) -> Result<(), MatchOutcome> {
        let room_id = outcome.room_id;
        self.slot.deliver(outcome)?;
        self.matched = true;
        self.room_id = Some(room_id);
        Ok(())
    }

    pub(crate) fn take_result(&mut self) -> Option<MatchOutcome> {
        self.slot.take()
    }
}
