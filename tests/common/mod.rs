use fairdraw::application::engine::RaffleEngine;
use fairdraw::domain::config::{RaffleConfig, RandomnessParams};
use fairdraw::domain::money::Amount;
use fairdraw::infrastructure::clock::ManualClock;
use fairdraw::infrastructure::in_memory::{InMemoryEventSink, InMemoryLedger, InMemoryRaffleStore};
use fairdraw::infrastructure::oracle::MockRandomnessCoordinator;
use rust_decimal::Decimal;

/// An engine wired to in-memory adapters, with handles kept for inspection.
pub struct Harness {
    pub engine: RaffleEngine,
    pub coordinator: MockRandomnessCoordinator,
    pub ledger: InMemoryLedger,
    pub events: InMemoryEventSink,
    pub clock: ManualClock,
}

pub async fn harness(fee: Decimal, interval_secs: u64) -> Harness {
    let coordinator = MockRandomnessCoordinator::new();
    let ledger = InMemoryLedger::new();
    let events = InMemoryEventSink::new();
    let clock = ManualClock::new();
    let config = RaffleConfig::new(
        Amount::new(fee).unwrap(),
        interval_secs,
        RandomnessParams::default(),
    );

    let engine = RaffleEngine::new(
        config,
        Box::new(coordinator.clone()),
        Box::new(ledger.clone()),
        Box::new(events.clone()),
        Box::new(InMemoryRaffleStore::new()),
        Box::new(clock.clone()),
    )
    .await
    .expect("Failed to build engine");

    Harness {
        engine,
        coordinator,
        ledger,
        events,
        clock,
    }
}
