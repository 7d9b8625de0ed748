use super::config::RandomnessParams;
use super::events::RaffleEvent;
use super::money::Balance;
use super::raffle::{ParticipantId, Raffle, RequestId};
use crate::error::Result;
use async_trait::async_trait;

/// External oracle supplying unpredictable random values.
///
/// The engine issues a request here and later receives the answer through its
/// own `fulfill_randomness` entry point, correlated by the returned id.
#[async_trait]
pub trait RandomnessSource: Send + Sync {
    async fn request_randomness(&self, params: &RandomnessParams) -> Result<RequestId>;
}

/// Funds transfer capability. A failed `pay` must leave the receiving side
/// unchanged so the engine can retry the payout.
#[async_trait]
pub trait PrizeLedger: Send + Sync {
    async fn pay(&self, to: &ParticipantId, amount: Balance) -> Result<()>;
}

/// Receives the notifications the engine emits.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn publish(&self, event: RaffleEvent) -> Result<()>;
}

/// Durable storage for the raffle snapshot.
#[async_trait]
pub trait RaffleStore: Send + Sync {
    async fn save(&self, raffle: &Raffle) -> Result<()>;
    async fn load(&self) -> Result<Option<Raffle>>;
}

/// Time source, in unix seconds.
pub trait Clock: Send + Sync {
    fn now_unix(&self) -> u64;
}

pub type RandomnessSourceBox = Box<dyn RandomnessSource>;
pub type PrizeLedgerBox = Box<dyn PrizeLedger>;
pub type EventSinkBox = Box<dyn EventSink>;
pub type RaffleStoreBox = Box<dyn RaffleStore>;
pub type ClockBox = Box<dyn Clock>;
