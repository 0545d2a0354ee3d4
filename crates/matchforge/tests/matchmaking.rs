//! End-to-end matchmaking scenarios driven directly through the engine,
//! with the background steps invoked by hand.

use std::sync::Arc;
use std::time::Duration;

use matchforge::prelude::*;

fn drain() -> MatchConfig {
    MatchConfig {
        pairing: PairingPolicy::Drain,
        ..MatchConfig::default()
    }
}

fn matched(resp: PollResponse) -> (PlayerId, RoomId) {
    match resp {
        PollResponse::Matched {
            opponent_id,
            room_id,
        } => (opponent_id, room_id),
        PollResponse::Waiting => panic!("expected a match, still waiting"),
    }
}

// =========================================================================
// Pairing and delivery
// =========================================================================

#[tokio::test]
async fn test_two_players_match_into_same_room() {
    let mm = Matchmaker::new(MatchConfig::default());
    assert_eq!(mm.join("A").await.unwrap().status, Status::Waiting);
    mm.join("B").await.unwrap();

    assert_eq!(mm.run_matching_tick().await.unwrap(), 1);

    let (a_opp, a_room) = matched(mm.poll("A").await.unwrap());
    let (b_opp, b_room) = matched(mm.poll("B").await.unwrap());
    assert_eq!(a_opp.as_str(), "B");
    assert_eq!(b_opp.as_str(), "A");
    assert_eq!(a_room, b_room);
}

#[tokio::test]
async fn test_lone_player_stays_waiting() {
    let mm = Matchmaker::new(MatchConfig::default());
    mm.join("A").await.unwrap();

    for _ in 0..3 {
        assert_eq!(mm.run_matching_tick().await.unwrap(), 0);
        assert_eq!(mm.poll("A").await.unwrap(), PollResponse::Waiting);
    }
    let snap = mm.snapshot().await;
    assert_eq!(snap.waiting_players, 1);
    assert_eq!(snap.active_rooms, 0);
}

#[tokio::test]
async fn test_poll_after_delivery_is_not_found() {
    let mm = Matchmaker::new(MatchConfig::default());
    mm.join("A").await.unwrap();
    mm.join("B").await.unwrap();
    mm.run_matching_tick().await.unwrap();

    matched(mm.poll("A").await.unwrap());
    let err = mm.poll("A").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_peek_does_not_consume() {
    let mm = Matchmaker::new(MatchConfig::default());
    mm.join("A").await.unwrap();
    mm.join("B").await.unwrap();
    assert!(mm.peek("A").await.unwrap().is_none());
    mm.run_matching_tick().await.unwrap();

    let first = mm.peek("A").await.unwrap().unwrap();
    let second = mm.peek("A").await.unwrap().unwrap();
    assert_eq!(first, second);

    let (opp, room) = matched(mm.poll("A").await.unwrap());
    assert_eq!(opp, first.opponent_id);
    assert_eq!(room, first.room_id);
}

#[tokio::test]
async fn test_fifo_order_across_ticks() {
    let mm = Matchmaker::new(MatchConfig::default());
    for id in ["A", "B", "C", "D"] {
        mm.join(id).await.unwrap();
    }

    assert_eq!(mm.run_matching_tick().await.unwrap(), 1);
    assert_eq!(matched(mm.poll("A").await.unwrap()).0.as_str(), "B");
    assert_eq!(mm.poll("C").await.unwrap(), PollResponse::Waiting);

    assert_eq!(mm.run_matching_tick().await.unwrap(), 1);
    assert_eq!(matched(mm.poll("D").await.unwrap()).0.as_str(), "C");
}

#[tokio::test]
async fn test_drain_pairs_everyone_in_one_tick() {
    let mm = Matchmaker::new(drain());
    for id in ["A", "B", "C", "D", "E"] {
        mm.join(id).await.unwrap();
    }

    assert_eq!(mm.run_matching_tick().await.unwrap(), 2);
    assert_eq!(matched(mm.poll("B").await.unwrap()).0.as_str(), "A");
    assert_eq!(matched(mm.poll("C").await.unwrap()).0.as_str(), "D");
    assert_eq!(mm.poll("E").await.unwrap(), PollResponse::Waiting);
}

#[tokio::test]
async fn test_empty_id_is_invalid_everywhere() {
    let mm = Matchmaker::new(MatchConfig::default());
    assert_eq!(mm.join("").await.unwrap_err().kind(), ErrorKind::InvalidArgument);
    assert_eq!(mm.poll("").await.unwrap_err().kind(), ErrorKind::InvalidArgument);
    assert_eq!(mm.cancel("").await.status, Status::Cancelled);
    assert_eq!(mm.snapshot().await.total_players, 0);
}

// =========================================================================
// Cancel and rejoin
// =========================================================================

#[tokio::test]
async fn test_cancelled_player_is_never_matched() {
    let mm = Matchmaker::new(drain());
    mm.join("A").await.unwrap();
    mm.join("B").await.unwrap();
    mm.join("C").await.unwrap();
    mm.cancel("A").await;

    assert_eq!(mm.poll("A").await.unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(mm.run_matching_tick().await.unwrap(), 1);
    assert_eq!(matched(mm.poll("B").await.unwrap()).0.as_str(), "C");
}

#[tokio::test]
async fn test_cancel_is_idempotent() {
    let mm = Matchmaker::new(MatchConfig::default());
    mm.join("A").await.unwrap();

    assert_eq!(mm.cancel("A").await.status, Status::Cancelled);
    assert_eq!(mm.cancel("A").await.status, Status::Cancelled);
    assert_eq!(mm.cancel("never-joined").await.status, Status::Cancelled);
    assert_eq!(mm.snapshot().await.total_players, 0);
}

#[tokio::test]
async fn test_duplicate_join_rejected_by_default() {
    let mm = Matchmaker::new(MatchConfig::default());
    mm.join("A").await.unwrap();

    let err = mm.join("A").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert_eq!(mm.snapshot().await.waiting_players, 1);
}

#[tokio::test]
async fn test_rejoin_replace_invalidates_old_room() {
    let mm = Matchmaker::new(MatchConfig {
        rejoin: RejoinPolicy::Replace,
        ..MatchConfig::default()
    });
    mm.join("A").await.unwrap();
    mm.join("B").await.unwrap();
    mm.run_matching_tick().await.unwrap();
    assert_eq!(mm.snapshot().await.active_rooms, 1);

    mm.join("A").await.unwrap();

    let snap = mm.snapshot().await;
    assert_eq!(snap.active_rooms, 0);
    assert_eq!(mm.poll("A").await.unwrap(), PollResponse::Waiting);
    // B still holds its delivered result.
    assert_eq!(matched(mm.poll("B").await.unwrap()).0.as_str(), "A");
}

// =========================================================================
// Cleanup
// =========================================================================

#[tokio::test]
async fn test_cleanup_keeps_room_until_a_member_leaves() {
    let mm = Matchmaker::new(MatchConfig::default());
    mm.join("A").await.unwrap();
    mm.join("B").await.unwrap();
    mm.run_matching_tick().await.unwrap();

    assert_eq!(mm.run_cleanup().await, 0);
    assert_eq!(mm.snapshot().await.active_rooms, 1);

    matched(mm.poll("A").await.unwrap());
    assert_eq!(mm.run_cleanup().await, 1);

    let snap = mm.snapshot().await;
    assert_eq!(snap.active_rooms, 0);
    assert_eq!(snap.total_players, 1);
    // B was never reaped; its result is still there.
    assert_eq!(matched(mm.poll("B").await.unwrap()).0.as_str(), "A");
}

#[tokio::test]
async fn test_cleanup_after_both_poll() {
    let mm = Matchmaker::new(MatchConfig::default());
    mm.join("A").await.unwrap();
    mm.join("B").await.unwrap();
    mm.run_matching_tick().await.unwrap();
    matched(mm.poll("A").await.unwrap());
    matched(mm.poll("B").await.unwrap());

    assert_eq!(mm.run_cleanup().await, 1);
    assert_eq!(mm.snapshot().await, Snapshot::default());
}

#[tokio::test]
async fn test_cleanup_prunes_room_of_players_matched_again() {
    let mm = Matchmaker::new(MatchConfig::default());
    mm.join("A").await.unwrap();
    mm.join("B").await.unwrap();
    mm.run_matching_tick().await.unwrap();
    let (_, first_room) = matched(mm.poll("A").await.unwrap());
    matched(mm.poll("B").await.unwrap());

    mm.join("A").await.unwrap();
    mm.join("B").await.unwrap();
    mm.run_matching_tick().await.unwrap();
    assert_eq!(mm.snapshot().await.active_rooms, 2);

    assert_eq!(mm.run_cleanup().await, 1);

    let snap = mm.snapshot().await;
    assert_eq!(snap.active_rooms, 1);
    assert_eq!(snap.matched_players, 2);
    assert_ne!(snap.active_rooms_list[0].room_id, first_room);

    let (_, second_room) = matched(mm.poll("A").await.unwrap());
    assert_eq!(snap.active_rooms_list[0].room_id, second_room);
}

#[tokio::test]
async fn test_cleanup_leaves_waiting_players_alone() {
    let mm = Matchmaker::new(MatchConfig::default());
    mm.join("A").await.unwrap();

    assert_eq!(mm.run_cleanup().await, 0);
    assert_eq!(mm.poll("A").await.unwrap(), PollResponse::Waiting);
}

// =========================================================================
// Snapshot
// =========================================================================

#[tokio::test]
async fn test_snapshot_counts_and_lists() {
    let mm = Matchmaker::new(MatchConfig::default());
    for id in ["A", "B", "C"] {
        mm.join(id).await.unwrap();
    }
    mm.run_matching_tick().await.unwrap();

    let snap = mm.snapshot().await;
    assert_eq!(snap.total_players, 3);
    assert_eq!(snap.waiting_players, 1);
    assert_eq!(snap.matched_players, 2);
    assert_eq!(snap.active_rooms, 1);
    assert_eq!(snap.waiting_players_list.len(), 1);
    assert_eq!(snap.waiting_players_list[0].id.as_str(), "C");

    let room = &snap.active_rooms_list[0];
    let names: Vec<&str> = room.players.iter().map(PlayerId::as_str).collect();
    assert_eq!(names, ["A", "B"]);
}

// =========================================================================
// Concurrency
// =========================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_operations_do_not_deadlock() {
    let mm = Matchmaker::shared(drain());

    let mut handles = Vec::new();
    for i in 0..64 {
        let mm = Arc::clone(&mm);
        handles.push(tokio::spawn(async move {
            let id = format!("p{i}");
            mm.join(&id).await.unwrap();
            mm.run_matching_tick().await.unwrap();
            let _ = mm.poll(&id).await;
            if i % 5 == 0 {
                mm.cancel(&id).await;
            }
            mm.run_cleanup().await;
            mm.snapshot().await;
        }));
    }

    let all = async {
        for h in handles {
            h.await.unwrap();
        }
    };
    tokio::time::timeout(Duration::from_secs(10), all)
        .await
        .expect("operations deadlocked");

    let snap = mm.snapshot().await;
    assert!(snap.waiting_players <= 1);
    assert_eq!(snap.total_players, snap.waiting_players + snap.matched_players);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_every_player_sees_exactly_one_match() {
    let mm = Matchmaker::shared(drain());
    let ids: Vec<String> = (0..40).map(|i| format!("p{i}")).collect();
    for id in &ids {
        mm.join(id).await.unwrap();
    }
    mm.run_matching_tick().await.unwrap();

    let mut handles = Vec::new();
    for id in &ids {
        for _ in 0..3 {
            let mm = Arc::clone(&mm);
            let id = id.clone();
            handles.push(tokio::spawn(async move { mm.poll(&id).await.is_ok() }));
        }
    }
    let mut delivered = 0;
    for h in handles {
        if h.await.unwrap() {
            delivered += 1;
        }
    }
    assert_eq!(delivered, ids.len());
}
