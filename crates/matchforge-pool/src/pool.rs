//! The player pool: registry plus FIFO waiting queue.
//!
//! Both live in one struct so a single lock covers them. Two invariants
//! hold after every public method returns:
//!
//! - an id is in `waiting` if and only if it is registered and unmatched;
//! - `waiting` is in arrival order and is only ever popped from the front.

use std::collections::{HashMap, VecDeque};

use matchforge_protocol::{PlayerId, RoomId};

use crate::{MatchOutcome, Player, PoolError};

/// What to do when a join arrives for an id that is already registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RejoinPolicy {
    /// Refuse with [`PoolError::AlreadyExists`]. The existing entry, and
    /// any match it is holding, is left untouched.
    #[default]
    Reject,
    /// Drop the existing entry and register a fresh one at the back of the
    /// pool. The replaced player is handed back so the caller can
    /// invalidate its room.
    Replace,
}

/// Result of a poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The result was consumed and the player has been reaped.
    Matched(MatchOutcome),
    /// Nothing delivered yet. No side effect.
    Waiting,
}

/// Registry of live players and the queue of those waiting for a match.
#[derive(Debug, Default)]
pub struct PlayerPool {
    /// Every joined, not-yet-reaped, not-cancelled player.
    players: HashMap<PlayerId, Player>,

    /// Ids of unmatched players in arrival order. Holds ids only; the
    /// `Player` itself is owned by `players`.
    waiting: VecDeque<PlayerId>,
}

impl PlayerPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a player and appends it to the back of the queue.
    ///
    /// Returns the replaced player when `policy` is
    /// [`RejoinPolicy::Replace`] and the id was already registered.
    ///
    /// # Errors
    /// [`PoolError::AlreadyExists`] under [`RejoinPolicy::Reject`] when the
    /// id is already registered.
    pub fn join(
        &mut self,
        id: PlayerId,
        policy: RejoinPolicy,
    ) -> Result<Option<Player>, PoolError> {
        let replaced = if self.players.contains_key(&id) {
            match policy {
                RejoinPolicy::Reject => return Err(PoolError::AlreadyExists(id)),
                RejoinPolicy::Replace => self.remove(&id),
            }
        } else {
            None
        };

        self.waiting.push_back(id.clone());
        self.players.insert(id.clone(), Player::new(id.clone()));

        tracing::debug!(player_id = %id, queued = self.waiting.len(), "player queued");
        Ok(replaced)
    }

    /// Removes a player from the registry and, if still waiting, from the
    /// queue. Unknown ids are a no-op.
    pub fn cancel(&mut self, id: &PlayerId) -> Option<Player> {
        let removed = self.remove(id);
        if removed.is_some() {
            tracing::debug!(player_id = %id, "player removed");
        }
        removed
    }

    /// Checks the player's result slot without blocking.
    ///
    /// When the slot is filled the outcome is consumed and the player is
    /// reaped from the registry in the same call. That is the only place a
    /// matched player leaves the registry on the normal path.
    ///
    /// # Errors
    /// [`PoolError::NotFound`] when the id is unknown or already reaped.
    pub fn poll(&mut self, id: &PlayerId) -> Result<PollOutcome, PoolError> {
        let player = self
            .players
            .get_mut(id)
            .ok_or_else(|| PoolError::NotFound(id.clone()))?;

        match player.take_result() {
            Some(outcome) => {
                self.players.remove(id);
                tracing::debug!(player_id = %id, room_id = %outcome.room_id, "player reaped");
                Ok(PollOutcome::Matched(outcome))
            }
            None => Ok(PollOutcome::Waiting),
        }
    }

    /// Non-consuming view of a player's delivered outcome.
    ///
    /// # Errors
    /// [`PoolError::NotFound`] when the id is unknown or already reaped.
    pub fn peek(&self, id: &PlayerId) -> Result<Option<&MatchOutcome>, PoolError> {
        self.players
            .get(id)
            .map(|p| p.slot().peek())
            .ok_or_else(|| PoolError::NotFound(id.clone()))
    }

    /// The two oldest waiting players, without taking them off the queue.
    ///
    /// [`pair_front`](Self::pair_front) called next, under the same
    /// borrow, pairs exactly these two.
    pub fn front_pair(&mut self) -> Option<(PlayerId, PlayerId)> {
        self.discard_stale_front();
        let mut front = self.waiting.iter().take(2).cloned();
        Some((front.next()?, front.next()?))
    }

    /// Pairs the two oldest waiting players into `room_id`.
    ///
    /// Both ids leave the queue, both players are marked matched, and each
    /// slot receives the other's id. Either all of that happens or none of
    /// it: with fewer than two waiting players nothing changes and `None`
    /// is returned.
    ///
    /// # Errors
    /// [`PoolError::SlotAlreadyFilled`] if a queued player already holds a
    /// result. Nothing is mutated in that case.
    pub fn pair_front(
        &mut self,
        room_id: RoomId,
    ) -> Result<Option<(PlayerId, PlayerId)>, PoolError> {
        self.discard_stale_front();
        if self.waiting.len() < 2 {
            return Ok(None);
        }

        for id in self.waiting.iter().take(2) {
            let player = self
                .players
                .get(id)
                .ok_or_else(|| PoolError::NotFound(id.clone()))?;
            if player.slot().is_written() {
                return Err(PoolError::SlotAlreadyFilled(id.clone()));
            }
        }

        let (Some(first), Some(second)) = (self.waiting.pop_front(), self.waiting.pop_front())
        else {
            return Ok(None);
        };

        for (me, opponent) in [(&first, &second), (&second, &first)] {
            if let Some(player) = self.players.get_mut(me) {
                let delivered = player.record_match(MatchOutcome {
                    opponent_id: opponent.clone(),
                    room_id,
                });
                debug_assert!(delivered.is_ok(), "slot of {me} written twice");
            }
        }

        Ok(Some((first, second)))
    }

    /// Looks up a registered player.
    pub fn get(&self, id: &PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    /// `true` while the id is registered (not reaped, not cancelled).
    pub fn contains(&self, id: &PlayerId) -> bool {
        self.players.contains_key(id)
    }

    /// Number of registered players, waiting or matched.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Number of players in the queue.
    pub fn waiting_len(&self) -> usize {
        self.waiting.len()
    }

    /// Registered players that have been matched but not yet polled.
    pub fn matched_len(&self) -> usize {
        self.players.len() - self.waiting.len()
    }

    /// Waiting players in queue order, oldest first.
    pub fn waiting_players(&self) -> impl Iterator<Item = &Player> {
        self.waiting.iter().filter_map(|id| self.players.get(id))
    }

    fn remove(&mut self, id: &PlayerId) -> Option<Player> {
        let removed = self.players.remove(id)?;
        if !removed.is_matched() {
            if let Some(pos) = self.waiting.iter().position(|w| w == id) {
                self.waiting.remove(pos);
            }
        }
        Some(removed)
    }

    /// Drops queue entries whose player is gone. Never expected to find
    /// anything; logged loudly if it does.
    fn discard_stale_front(&mut self) {
        while let Some(front) = self.waiting.front() {
            if self.players.contains_key(front) {
                break;
            }
            tracing::warn!(player_id = %front, "dropping unregistered id from queue front");
            self.waiting.pop_front();
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
