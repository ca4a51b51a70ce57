//! Integration tests for the availability mutation path.
//!
//! Verifies the capacity invariant under concurrent writers, rejection
//! (not clamping) of out-of-range values, authorization, idempotence, and
//! the commit-then-publish event contract.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use spotwatch_core::error::CoreError;
use spotwatch_core::lot::UpdateAvailability;
use spotwatch_events::{SubscriptionHub, EVENT_AVAILABILITY_CHANGED};
use spotwatch_store::{LotRepo, MemoryStore};
use uuid::Uuid;

use common::{owner, seed_lot, stranger};

fn set_available(available: i64) -> UpdateAvailability {
    UpdateAvailability {
        available_spots: Some(available),
        is_open: None,
    }
}

// ---------------------------------------------------------------------------
// Test: capacity invariant holds across concurrent writers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn concurrent_updates_preserve_capacity_invariant() {
    let store = Arc::new(MemoryStore::new());
    let hub = Arc::new(SubscriptionHub::default());
    let actor = owner();
    let lot = seed_lot(&store, &actor, "Contended Lot").await;

    let mut tasks = Vec::new();
    for i in 0..32i64 {
        let store = Arc::clone(&store);
        let hub = Arc::clone(&hub);
        let lot_id = lot.id;
        tasks.push(tokio::spawn(async move {
            // Values 0..=10 are valid; 11 and up must be rejected without
            // touching state.
            let requested = i % 13;
            LotRepo::update_availability(&store, &hub, lot_id, set_available(requested), &actor)
                .await
        }));
    }

    let mut accepted = Vec::new();
    for task in tasks {
        match task.await.expect("task completes") {
            Ok(snapshot) => {
                assert!(snapshot.available_spots <= snapshot.total_spots);
                accepted.push(snapshot.available_spots);
            }
            Err(err) => assert_matches!(err, CoreError::Validation(_)),
        }
    }
    assert!(!accepted.is_empty());

    // The final persisted state is exactly one of the committed writes,
    // never a byte-mixed combination, and the invariant holds.
    let final_lot = LotRepo::get(&store, lot.id).await.expect("lot exists");
    assert!(final_lot.available_spots <= final_lot.total_spots);
    assert!(accepted.contains(&final_lot.available_spots));
}

// ---------------------------------------------------------------------------
// Test: out-of-range values are rejected, not clamped
// ---------------------------------------------------------------------------

#[tokio::test]
async fn out_of_range_update_is_rejected_without_side_effects() {
    let store = MemoryStore::new();
    let hub = SubscriptionHub::default();
    let actor = owner();
    let lot = seed_lot(&store, &actor, "Strict Lot").await;

    let client = Uuid::new_v4();
    let mut rx = hub.register(client).await;
    hub.subscribe(client, lot.id).await;

    for bad in [-1, 11, 1000] {
        let err = LotRepo::update_availability(&store, &hub, lot.id, set_available(bad), &actor)
            .await
            .expect_err("out of range");
        assert_matches!(err, CoreError::Validation(_));
    }

    let after = LotRepo::get(&store, lot.id).await.expect("lot exists");
    assert_eq!(after.available_spots, lot.available_spots);
    assert!(rx.try_recv().is_err(), "no event for a rejected update");
}

// ---------------------------------------------------------------------------
// Test: non-owner, non-admin callers always fail and change nothing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stranger_is_forbidden_and_state_is_untouched() {
    let store = MemoryStore::new();
    let hub = SubscriptionHub::default();
    let actor = owner();
    let lot = seed_lot(&store, &actor, "Private Lot").await;

    let intruder = stranger();
    let err = LotRepo::update_availability(
        &store,
        &hub,
        lot.id,
        UpdateAvailability {
            available_spots: Some(0),
            is_open: Some(false),
        },
        &intruder,
    )
    .await
    .expect_err("strangers cannot update");
    assert_matches!(err, CoreError::Forbidden(_));

    let after = LotRepo::get(&store, lot.id).await.expect("lot exists");
    assert_eq!(after.available_spots, lot.available_spots);
    assert_eq!(after.is_open, lot.is_open);
    assert_eq!(after.last_updated, lot.last_updated);
}

// ---------------------------------------------------------------------------
// Test: repeating an update is a state no-op but refreshes last_updated
// ---------------------------------------------------------------------------

#[tokio::test]
async fn same_values_twice_is_idempotent_state_wise() {
    let store = MemoryStore::new();
    let hub = SubscriptionHub::default();
    let actor = owner();
    let lot = seed_lot(&store, &actor, "Idempotent Lot").await;

    let update = UpdateAvailability {
        available_spots: Some(4),
        is_open: Some(true),
    };

    let first = LotRepo::update_availability(&store, &hub, lot.id, update.clone(), &actor)
        .await
        .expect("first update");
    let second = LotRepo::update_availability(&store, &hub, lot.id, update, &actor)
        .await
        .expect("second update");

    assert_eq!(second.available_spots, first.available_spots);
    assert_eq!(second.is_open, first.is_open);
    assert_eq!(second.occupancy_percentage(), first.occupancy_percentage());
    assert!(second.last_updated >= first.last_updated);
}

// ---------------------------------------------------------------------------
// Test: occupancy percentage tracks the committed counts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn occupancy_percentage_follows_the_mutation() {
    let store = MemoryStore::new();
    let hub = SubscriptionHub::default();
    let actor = owner();
    let lot = seed_lot(&store, &actor, "Occupancy Lot").await;

    let snapshot = LotRepo::update_availability(&store, &hub, lot.id, set_available(3), &actor)
        .await
        .expect("update");
    // 7 of 10 occupied.
    assert_eq!(snapshot.occupancy_percentage(), 70);

    let snapshot = LotRepo::update_availability(&store, &hub, lot.id, set_available(10), &actor)
        .await
        .expect("update");
    assert_eq!(snapshot.occupancy_percentage(), 0);
}

// ---------------------------------------------------------------------------
// Test: events are published after commit, in commit order, with state
// ---------------------------------------------------------------------------

#[tokio::test]
async fn events_carry_committed_state_in_commit_order() {
    let store = MemoryStore::new();
    let hub = SubscriptionHub::default();
    let actor = owner();
    let lot = seed_lot(&store, &actor, "Evented Lot").await;

    let client = Uuid::new_v4();
    let mut rx = hub.register(client).await;
    hub.subscribe(client, lot.id).await;

    for available in [9, 5, 0] {
        LotRepo::update_availability(&store, &hub, lot.id, set_available(available), &actor)
            .await
            .expect("update");
    }

    for expected in [9, 5, 0] {
        let event = rx.recv().await.expect("event delivered");
        assert_eq!(event.event_type, EVENT_AVAILABILITY_CHANGED);
        assert_eq!(event.lot_id, lot.id);
        assert_eq!(event.payload["available_spots"], expected);
    }
}

// ---------------------------------------------------------------------------
// Test: soft-deleted lots cannot be updated
// ---------------------------------------------------------------------------

#[tokio::test]
async fn deactivated_lot_is_not_found_for_updates() {
    let store = MemoryStore::new();
    let hub = SubscriptionHub::default();
    let actor = owner();
    let lot = seed_lot(&store, &actor, "Gone Lot").await;

    LotRepo::deactivate(&store, lot.id, &actor)
        .await
        .expect("deactivate");

    let err = LotRepo::update_availability(&store, &hub, lot.id, set_available(1), &actor)
        .await
        .expect_err("inactive lot");
    assert_matches!(err, CoreError::NotFound { .. });
}
