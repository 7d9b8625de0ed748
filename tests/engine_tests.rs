use fairdraw::domain::events::RaffleEvent;
use fairdraw::domain::money::Balance;
use fairdraw::domain::raffle::{ParticipantId, RaffleState, RequestId};
use fairdraw::error::RaffleError;
use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

mod common;
use common::harness;

#[tokio::test]
async fn test_full_round_pays_entire_pool_to_selected_winner() {
    let h = harness(dec!(10), 60).await;

    for name in ["alice", "bob", "carol"] {
        h.engine
            .enter(name.into(), Balance::new(dec!(10)))
            .await
            .unwrap();
    }
    assert_eq!(h.engine.pool().await, Balance::new(dec!(30)));
    assert_eq!(h.engine.entrant_count().await, 3);
    assert!(!h.engine.check_upkeep().await);

    h.clock.advance(61);
    assert!(h.engine.check_upkeep().await);

    let request_id = h.engine.perform_upkeep().await.unwrap();
    assert_eq!(h.engine.state().await, RaffleState::Calculating);
    assert_eq!(h.engine.pending_request().await, Some(request_id));

    // 7 mod 3 = 1: the second entrant wins
    let winner = h.engine.fulfill_randomness(request_id, &[7]).await.unwrap();
    assert_eq!(winner, ParticipantId::new("bob"));
    assert_eq!(
        h.ledger.balance_of(&"bob".into()).await,
        Balance::new(dec!(30))
    );

    assert_eq!(h.engine.state().await, RaffleState::Open);
    assert_eq!(h.engine.entrant_count().await, 0);
    assert_eq!(h.engine.pool().await, Balance::ZERO);
    assert_eq!(h.engine.last_round_timestamp().await, 61);
    assert!(h.engine.pending_request().await.is_none());
    assert_eq!(h.engine.recent_winner().await, Some("bob".into()));

    assert_eq!(
        h.events.events().await,
        vec![
            RaffleEvent::Entered {
                participant: "alice".into()
            },
            RaffleEvent::Entered {
                participant: "bob".into()
            },
            RaffleEvent::Entered {
                participant: "carol".into()
            },
            RaffleEvent::UpkeepPerformed { request_id },
            RaffleEvent::WinnerPicked {
                winner: "bob".into()
            },
        ]
    );
}

#[tokio::test]
async fn test_enter_below_fee_fails_regardless_of_round_history() {
    let h = harness(dec!(10), 60).await;

    let result = h.engine.enter("alice".into(), Balance::new(dec!(9))).await;
    assert!(matches!(result, Err(RaffleError::InsufficientFunds { .. })));

    // Complete a round, then try again
    h.engine
        .enter("alice".into(), Balance::new(dec!(10)))
        .await
        .unwrap();
    h.clock.advance(61);
    let request_id = h.engine.perform_upkeep().await.unwrap();
    h.engine.fulfill_randomness(request_id, &[0]).await.unwrap();

    let result = h.engine.enter("alice".into(), Balance::new(dec!(0))).await;
    assert!(matches!(result, Err(RaffleError::InsufficientFunds { .. })));
    assert_eq!(h.engine.entrant_count().await, 0);
}

#[tokio::test]
async fn test_enter_rejected_while_round_is_calculating() {
    let h = harness(dec!(10), 60).await;
    h.engine
        .enter("alice".into(), Balance::new(dec!(10)))
        .await
        .unwrap();
    h.clock.advance(61);
    h.engine.perform_upkeep().await.unwrap();

    let result = h.engine.enter("bob".into(), Balance::new(dec!(10))).await;
    assert!(matches!(result, Err(RaffleError::NotOpen)));
    assert_eq!(h.engine.entrant_count().await, 1);
    assert_eq!(h.engine.pool().await, Balance::new(dec!(10)));
}

#[tokio::test]
async fn test_check_upkeep_false_until_all_conditions_hold() {
    let h = harness(dec!(10), 60).await;

    // No entrants, even after the interval
    h.clock.advance(61);
    assert!(!h.engine.check_upkeep().await);
    assert!(matches!(
        h.engine.perform_upkeep().await,
        Err(RaffleError::UpkeepNotNeeded(_))
    ));

    // Entrants present but interval not yet elapsed again after a round
    h.engine
        .enter("alice".into(), Balance::new(dec!(10)))
        .await
        .unwrap();
    assert!(h.engine.check_upkeep().await);
    let request_id = h.engine.perform_upkeep().await.unwrap();

    // Calculating: predicate is false
    assert!(!h.engine.check_upkeep().await);

    h.engine.fulfill_randomness(request_id, &[0]).await.unwrap();
    h.engine
        .enter("bob".into(), Balance::new(dec!(10)))
        .await
        .unwrap();
    h.clock.advance(59);
    assert!(!h.engine.check_upkeep().await);
    h.clock.advance(1);
    assert!(h.engine.check_upkeep().await);
}

#[tokio::test]
async fn test_failed_upkeep_leaves_state_untouched() {
    let h = harness(dec!(10), 60).await;
    h.engine
        .enter("alice".into(), Balance::new(dec!(10)))
        .await
        .unwrap();

    // Interval has not elapsed
    let result = h.engine.perform_upkeep().await;
    match result {
        Err(RaffleError::UpkeepNotNeeded(status)) => {
            assert_eq!(status.entrants, 1);
            assert_eq!(status.pool, Balance::new(dec!(10)));
            assert_eq!(status.state, RaffleState::Open);
            assert!(status.elapsed_secs < status.interval_secs);
        }
        other => panic!("expected UpkeepNotNeeded, got {:?}", other),
    }

    assert_eq!(h.engine.state().await, RaffleState::Open);
    assert_eq!(h.engine.entrant_count().await, 1);
    assert_eq!(h.engine.pool().await, Balance::new(dec!(10)));
    assert!(h.engine.pending_request().await.is_none());
    assert!(h.coordinator.requests().await.is_empty());
}

#[tokio::test]
async fn test_second_upkeep_before_fulfillment_fails() {
    let h = harness(dec!(10), 60).await;
    h.engine
        .enter("alice".into(), Balance::new(dec!(10)))
        .await
        .unwrap();
    h.clock.advance(61);

    let first = h.engine.perform_upkeep().await.unwrap();
    let second = h.engine.perform_upkeep().await;
    assert!(matches!(second, Err(RaffleError::UpkeepNotNeeded(_))));
    assert_eq!(h.engine.pending_request().await, Some(first));
    assert_eq!(h.coordinator.requests().await.len(), 1);
}

#[tokio::test]
async fn test_fulfillment_with_unrecognized_request_rejected() {
    let h = harness(dec!(10), 60).await;

    // Nothing pending at all
    let result = h.engine.fulfill_randomness(RequestId(1), &[7]).await;
    assert!(matches!(result, Err(RaffleError::UnrecognizedRequest(_))));

    h.engine
        .enter("alice".into(), Balance::new(dec!(10)))
        .await
        .unwrap();
    h.clock.advance(61);
    let request_id = h.engine.perform_upkeep().await.unwrap();

    // Wrong identifier while a request is pending
    let forged = RequestId(request_id.0 + 1);
    let result = h.engine.fulfill_randomness(forged, &[7]).await;
    assert!(matches!(result, Err(RaffleError::UnrecognizedRequest(_))));

    assert_eq!(h.engine.state().await, RaffleState::Calculating);
    assert_eq!(h.engine.entrant_count().await, 1);
    assert_eq!(h.engine.pool().await, Balance::new(dec!(10)));
    assert_eq!(h.engine.pending_request().await, Some(request_id));
    assert_eq!(h.ledger.balances().await.len(), 0);
}

#[tokio::test]
async fn test_stale_callback_after_completed_round_rejected() {
    let h = harness(dec!(10), 60).await;
    h.engine
        .enter("alice".into(), Balance::new(dec!(10)))
        .await
        .unwrap();
    h.clock.advance(61);
    let request_id = h.engine.perform_upkeep().await.unwrap();
    h.engine.fulfill_randomness(request_id, &[0]).await.unwrap();

    // A duplicate delivery of the same callback must be refused
    let result = h.engine.fulfill_randomness(request_id, &[0]).await;
    assert!(matches!(result, Err(RaffleError::UnrecognizedRequest(_))));
    assert_eq!(
        h.ledger.balance_of(&"alice".into()).await,
        Balance::new(dec!(10))
    );
}

#[tokio::test]
async fn test_fulfillment_without_words_rejected() {
    let h = harness(dec!(10), 60).await;
    h.engine
        .enter("alice".into(), Balance::new(dec!(10)))
        .await
        .unwrap();
    h.clock.advance(61);
    let request_id = h.engine.perform_upkeep().await.unwrap();

    let result = h.engine.fulfill_randomness(request_id, &[]).await;
    assert!(matches!(result, Err(RaffleError::Validation(_))));
    assert_eq!(h.engine.state().await, RaffleState::Calculating);
    assert_eq!(h.engine.pending_request().await, Some(request_id));
}

#[tokio::test]
async fn test_failed_payout_keeps_round_retryable() {
    let h = harness(dec!(10), 60).await;
    for name in ["alice", "bob"] {
        h.engine
            .enter(name.into(), Balance::new(dec!(10)))
            .await
            .unwrap();
    }
    h.clock.advance(61);
    let request_id = h.engine.perform_upkeep().await.unwrap();

    h.ledger.fail_transfers(true).await;
    let result = h.engine.fulfill_randomness(request_id, &[3]).await;
    match result {
        Err(RaffleError::PayoutFailed { winner, amount, .. }) => {
            assert_eq!(winner, ParticipantId::new("bob"));
            assert_eq!(amount, Balance::new(dec!(20)));
        }
        other => panic!("expected PayoutFailed, got {:?}", other),
    }

    // Nothing was reset: the round can be inspected and retried
    assert_eq!(h.engine.state().await, RaffleState::Calculating);
    assert_eq!(h.engine.entrant_count().await, 2);
    assert_eq!(h.engine.pool().await, Balance::new(dec!(20)));
    assert_eq!(h.engine.pending_request().await, Some(request_id));
    assert_eq!(h.ledger.balance_of(&"bob".into()).await, Balance::ZERO);

    // Once the ledger recovers the same callback settles the round
    h.ledger.fail_transfers(false).await;
    let winner = h.engine.fulfill_randomness(request_id, &[3]).await.unwrap();
    assert_eq!(winner, ParticipantId::new("bob"));
    assert_eq!(
        h.ledger.balance_of(&"bob".into()).await,
        Balance::new(dec!(20))
    );
    assert_eq!(h.engine.state().await, RaffleState::Open);
}

#[tokio::test]
async fn test_rounds_cycle_indefinitely() {
    let h = harness(dec!(10), 60).await;

    // Round one
    for name in ["alice", "bob"] {
        h.engine
            .enter(name.into(), Balance::new(dec!(10)))
            .await
            .unwrap();
    }
    h.clock.advance(61);
    let first = h.engine.perform_upkeep().await.unwrap();
    let winner = h.engine.fulfill_randomness(first, &[1]).await.unwrap();
    assert_eq!(winner, ParticipantId::new("bob"));

    // Round two starts from a clean slate and needs a fresh interval
    h.engine
        .enter("carol".into(), Balance::new(dec!(10)))
        .await
        .unwrap();
    assert!(!h.engine.check_upkeep().await);
    h.clock.advance(60);

    let second = h.engine.perform_upkeep().await.unwrap();
    assert_ne!(first, second);
    let winner = h.engine.fulfill_randomness(second, &[5]).await.unwrap();
    assert_eq!(winner, ParticipantId::new("carol"));

    assert_eq!(
        h.ledger.balance_of(&"bob".into()).await,
        Balance::new(dec!(20))
    );
    assert_eq!(
        h.ledger.balance_of(&"carol".into()).await,
        Balance::new(dec!(10))
    );
}

#[tokio::test]
async fn test_duplicate_identities_hold_independent_slots() {
    let h = harness(dec!(10), 60).await;
    for name in ["alice", "alice", "bob"] {
        h.engine
            .enter(name.into(), Balance::new(dec!(10)))
            .await
            .unwrap();
    }
    assert_eq!(h.engine.entrant_count().await, 3);
    assert_eq!(h.engine.entrant(1).await, Some("alice".into()));

    h.clock.advance(61);
    let request_id = h.engine.perform_upkeep().await.unwrap();
    // 4 mod 3 = 1: alice's second slot wins
    let winner = h.engine.fulfill_randomness(request_id, &[4]).await.unwrap();
    assert_eq!(winner, ParticipantId::new("alice"));
    assert_eq!(
        h.ledger.balance_of(&"alice".into()).await,
        Balance::new(dec!(30))
    );
}

#[tokio::test]
async fn test_read_accessors_reflect_configuration() {
    let h = harness(dec!(10), 60).await;
    assert_eq!(h.engine.entrance_fee().await, Balance::new(dec!(10)));
    assert_eq!(h.engine.interval_secs().await, 60);
    assert_eq!(h.engine.randomness_params().num_words, 1);
    assert_eq!(h.engine.upkeep_status().await.interval_secs, 60);

    let snapshot = h.engine.snapshot().await;
    assert_eq!(snapshot.state(), RaffleState::Open);
    assert_eq!(snapshot.entrance_fee(), Balance::new(dec!(10)));
    assert_eq!(snapshot.last_timestamp(), 0);
}

#[tokio::test]
async fn test_winner_index_follows_modulo_rule_for_random_population() {
    let mut rng = rand::thread_rng();
    let population: u64 = rng.gen_range(3..=12);
    let word: u64 = rng.r#gen();

    let h = harness(dec!(10), 60).await;
    for i in 0..population {
        h.engine
            .enter(ParticipantId::new(format!("p{}", i)), Balance::new(dec!(10)))
            .await
            .unwrap();
    }
    h.clock.advance(61);
    let request_id = h.engine.perform_upkeep().await.unwrap();
    let winner = h
        .engine
        .fulfill_randomness(request_id, &[word])
        .await
        .unwrap();

    let expected = ParticipantId::new(format!("p{}", word % population));
    assert_eq!(winner, expected);
    assert_eq!(
        h.ledger.balance_of(&expected).await,
        Balance::new(dec!(10) * Decimal::from(population))
    );
}
