//! The matchmaking engine.
//!
//! Shared state is split into two regions, each behind its own lock:
//!
//! ```text
//! pool:  Mutex<PlayerPool>    registry + FIFO queue + result slots
//! rooms: Mutex<RoomRegistry>  active pairings
//! ```
//!
//! Request handlers that only need one region take only that lock. Every
//! path that needs both (pairing, cleanup, snapshot, rejoin-replace) goes
//! through [`Matchmaker::lock_both`], which takes `pool` first and `rooms`
//! second. Nothing acquires `pool` while holding `rooms`; that ordering is
//! what keeps the background tasks and the handlers deadlock-free.

use std::sync::Arc;

use matchforge_pool::{MatchOutcome, Player, PlayerPool, PollOutcome, RejoinPolicy};
use matchforge_protocol::{
    CancelResponse, JoinResponse, PlayerId, PollResponse, Snapshot, WaitingPlayerEntry,
};
use matchforge_room::{Room, RoomRegistry};
use tokio::sync::{Mutex, MutexGuard};

use crate::{MatchConfig, MatchforgeError, PairingPolicy, RoomIdSource, UuidRoomIds};

/// Pairs players first-come-first-served and holds results until polled.
///
/// Share it as `Arc<Matchmaker>` between the HTTP handlers and the
/// background tasks.
pub struct Matchmaker {
    pool: Mutex<PlayerPool>,
    rooms: Mutex<RoomRegistry>,
    room_ids: Box<dyn RoomIdSource>,
    config: MatchConfig,
}

impl Matchmaker {
    /// Creates an empty matchmaker with random UUID room ids.
    pub fn new(config: MatchConfig) -> Self {
        Self::with_room_ids(config, UuidRoomIds)
    }

    /// Creates an empty matchmaker drawing room ids from `room_ids`.
    pub fn with_room_ids(config: MatchConfig, room_ids: impl RoomIdSource) -> Self {
        Self {
            pool: Mutex::new(PlayerPool::new()),
            rooms: Mutex::new(RoomRegistry::new()),
            room_ids: Box::new(room_ids),
            config: config.validated(),
        }
    }

    /// Convenience for the common `Arc` wrapping.
    pub fn shared(config: MatchConfig) -> Arc<Self> {
        Arc::new(Self::new(config))
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Acquires both regions in the one permitted order.
    async fn lock_both(&self) -> (MutexGuard<'_, PlayerPool>, MutexGuard<'_, RoomRegistry>) {
        let pool = self.pool.lock().await;
        let rooms = self.rooms.lock().await;
        (pool, rooms)
    }

    // -----------------------------------------------------------------
    // Boundary operations
    // -----------------------------------------------------------------

    /// Registers a player and queues it for pairing.
    ///
    /// # Errors
    /// - `InvalidArgument` for an empty id
    /// - `AlreadyExists` when the id is registered and the rejoin policy is
    ///   [`RejoinPolicy::Reject`]
    pub async fn join(&self, raw_id: &str) -> Result<JoinResponse, MatchforgeError> {
        let id = PlayerId::new(raw_id)?;

        match self.config.rejoin {
            RejoinPolicy::Reject => {
                self.pool.lock().await.join(id.clone(), RejoinPolicy::Reject)?;
            }
            RejoinPolicy::Replace => {
                let (mut pool, mut rooms) = self.lock_both().await;
                if let Some(old) = pool.join(id.clone(), RejoinPolicy::Replace)? {
                    let invalidated = old.room_id().and_then(|room_id| rooms.remove(&room_id).ok());
                    tracing::info!(
                        player_id = %id,
                        was_matched = old.is_matched(),
                        room_invalidated = invalidated.is_some(),
                        "player rejoined, previous entry replaced"
                    );
                }
            }
        }

        tracing::info!(player_id = %id, "player joined");
        Ok(JoinResponse::waiting(id))
    }

    /// Removes a player before it is matched. Always succeeds.
    ///
    /// Unknown (or empty) ids are a no-op. Cancelling an already matched
    /// player only drops it from the registry; its room is left for the
    /// cleanup pass.
    pub async fn cancel(&self, raw_id: &str) -> CancelResponse {
        if let Ok(id) = PlayerId::new(raw_id) {
            if let Some(removed) = self.pool.lock().await.cancel(&id) {
                tracing::info!(player_id = %id, was_matched = removed.is_matched(), "player cancelled");
            }
        }
        CancelResponse::cancelled()
    }

    /// Non-blocking status check.
    ///
    /// A delivered match is returned once and the player is reaped in the
    /// same step; any later poll for the id fails with `NotFound`.
    ///
    /// # Errors
    /// - `InvalidArgument` for an empty id
    /// - `NotFound` for an unknown or already reaped id
    pub async fn poll(&self, raw_id: &str) -> Result<PollResponse, MatchforgeError> {
        let id = PlayerId::new(raw_id)?;
        let outcome = self.pool.lock().await.poll(&id)?;

        Ok(match outcome {
            PollOutcome::Matched(MatchOutcome {
                opponent_id,
                room_id,
            }) => {
                tracing::info!(player_id = %id, opponent_id = %opponent_id, %room_id, "match result delivered");
                PollResponse::Matched {
                    opponent_id,
                    room_id,
                }
            }
            PollOutcome::Waiting => PollResponse::Waiting,
        })
    }

    /// Non-consuming look at a player's delivered result.
    ///
    /// # Errors
    /// Same as [`poll`](Self::poll).
    pub async fn peek(&self, raw_id: &str) -> Result<Option<MatchOutcome>, MatchforgeError> {
        let id = PlayerId::new(raw_id)?;
        let pool = self.pool.lock().await;
        Ok(pool.peek(&id)?.cloned())
    }

    /// A consistent point-in-time view across both regions.
    pub async fn snapshot(&self) -> Snapshot {
        let (pool, rooms) = self.lock_both().await;

        let waiting_players_list = pool
            .waiting_players()
            .map(|p| WaitingPlayerEntry {
                id: p.id().clone(),
                joined_at_ms: p.joined_at_unix_ms(),
                waiting_for_ms: p.waited().as_millis() as u64,
            })
            .collect();
        let active_rooms_list = rooms.rooms().into_iter().map(Room::entry).collect();

        Snapshot {
            total_players: pool.len(),
            waiting_players: pool.waiting_len(),
            matched_players: pool.matched_len(),
            active_rooms: rooms.len(),
            waiting_players_list,
            active_rooms_list,
        }
    }

    // -----------------------------------------------------------------
    // Background work
    // -----------------------------------------------------------------

    /// One matching-loop iteration. Returns the number of rooms created.
    ///
    /// Each pairing step looks at the two oldest waiting players, builds
    /// their room and registers it, and only then takes them off the queue.
    /// Anything that fails before that point (id collision, bad pair)
    /// leaves both regions as they were; the same players are considered
    /// again on the next tick. If the pool refuses the pair, the room is
    /// withdrawn again.
    ///
    /// # Errors
    /// `Room(DuplicateId)` on an id collision. Rooms created earlier in the
    /// same call (under [`PairingPolicy::Drain`]) stay in place.
    pub async fn run_matching_tick(&self) -> Result<usize, MatchforgeError> {
        let (mut pool, mut rooms) = self.lock_both().await;
        let mut created = 0;

        while let Some((first, second)) = pool.front_pair() {
            let room_id = self.room_ids.next_room_id();
            rooms.insert(Room::new(room_id, first.clone(), second.clone())?)?;

            match pool.pair_front(room_id) {
                Ok(Some(paired)) => debug_assert_eq!(paired, (first.clone(), second.clone())),
                Ok(None) => {
                    rooms.remove(&room_id)?;
                    break;
                }
                Err(e) => {
                    rooms.remove(&room_id)?;
                    return Err(e.into());
                }
            }
            created += 1;

            let waited_ms = pool
                .get(&first)
                .map(|p| p.waited().as_millis() as u64)
                .unwrap_or_default();
            tracing::info!(%room_id, first = %first, second = %second, waited_ms, "players matched");

            if self.config.pairing == PairingPolicy::OncePerTick {
                break;
            }
        }

        Ok(created)
    }

    /// One cleanup pass. Returns the number of rooms removed.
    ///
    /// A room is done once either member is no longer bound to it: reaped
    /// by its poll, cancelled, or registered again under the same id since.
    /// The pool and unmatched players are not touched.
    pub async fn run_cleanup(&self) -> usize {
        let (pool, mut rooms) = self.lock_both().await;
        let pruned = rooms.prune(|room| {
            room.players()
                .iter()
                .all(|p| pool.get(p).and_then(Player::room_id) == Some(room.id()))
        });

        for room_id in &pruned {
            tracing::debug!(%room_id, "room pruned");
        }
        if !pruned.is_empty() {
            tracing::info!(pruned = pruned.len(), remaining = rooms.len(), "cleanup pass");
        }
        pruned.len()
    }
}
