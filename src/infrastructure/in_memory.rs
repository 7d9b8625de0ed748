use crate::domain::events::RaffleEvent;
use crate::domain::money::Balance;
use crate::domain::ports::{EventSink, PrizeLedger, RaffleStore};
use crate::domain::raffle::{ParticipantId, Raffle};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use tokio::sync::RwLock;

/// An in-memory prize ledger.
///
/// Uses `Arc<RwLock<…>>` so cloned handles share the same balances; a test or
/// driver keeps one handle to inspect payouts while the engine owns another.
/// Transfer failures can be injected to exercise the payout-failure path.
#[derive(Default, Clone)]
pub struct InMemoryLedger {
    inner: Arc<RwLock<LedgerInner>>,
}

#[derive(Default)]
struct LedgerInner {
    balances: HashMap<ParticipantId, Balance>,
    failing: bool,
}

impl InMemoryLedger {
    /// Creates a new, empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent transfer fail (or succeed again).
    pub async fn fail_transfers(&self, failing: bool) {
        self.inner.write().await.failing = failing;
    }

    pub async fn balance_of(&self, participant: &ParticipantId) -> Balance {
        let inner = self.inner.read().await;
        inner
            .balances
            .get(participant)
            .copied()
            .unwrap_or(Balance::ZERO)
    }

    /// All credited balances, sorted by participant.
    pub async fn balances(&self) -> Vec<(ParticipantId, Balance)> {
        let inner = self.inner.read().await;
        let mut balances: Vec<_> = inner
            .balances
            .iter()
            .map(|(participant, balance)| (participant.clone(), *balance))
            .collect();
        balances.sort_by(|a, b| a.0.cmp(&b.0));
        balances
    }
}

#[async_trait]
impl PrizeLedger for InMemoryLedger {
    async fn pay(&self, to: &ParticipantId, amount: Balance) -> Result<()> {
        let mut inner = self.inner.write().await;
        if inner.failing {
            return Err(io::Error::other("transfer rejected by ledger").into());
        }
        let balance = inner.balances.entry(to.clone()).or_default();
        *balance += amount;
        Ok(())
    }
}

/// Event sink that records every published notification in order.
#[derive(Default, Clone)]
pub struct InMemoryEventSink {
    events: Arc<RwLock<Vec<RaffleEvent>>>,
}

impl InMemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn events(&self) -> Vec<RaffleEvent> {
        self.events.read().await.clone()
    }

    /// Drains the recorded notifications.
    pub async fn take(&self) -> Vec<RaffleEvent> {
        std::mem::take(&mut *self.events.write().await)
    }
}

#[async_trait]
impl EventSink for InMemoryEventSink {
    async fn publish(&self, event: RaffleEvent) -> Result<()> {
        self.events.write().await.push(event);
        Ok(())
    }
}

/// Raffle snapshot store without persistence, for tests and plain runs.
#[derive(Default, Clone)]
pub struct InMemoryRaffleStore {
    snapshot: Arc<RwLock<Option<Raffle>>>,
}

impl InMemoryRaffleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RaffleStore for InMemoryRaffleStore {
    async fn save(&self, raffle: &Raffle) -> Result<()> {
        *self.snapshot.write().await = Some(raffle.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<Raffle>> {
        Ok(self.snapshot.read().await.clone())
    }
}
