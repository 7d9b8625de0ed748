use crate::domain::config::{RaffleConfig, RandomnessParams};
use crate::domain::events::RaffleEvent;
use crate::domain::money::Balance;
use crate::domain::ports::{
    ClockBox, EventSinkBox, PrizeLedgerBox, RaffleStoreBox, RandomnessSourceBox,
};
use crate::domain::raffle::{ParticipantId, Raffle, RaffleState, RequestId, UpkeepStatus};
use crate::error::{RaffleError, Result};
use tokio::sync::RwLock;

/// The main entry point for the raffle.
///
/// `RaffleEngine` wraps the raffle aggregate in a single `RwLock` so that
/// `enter`, `perform_upkeep`, and `fulfill_randomness` never interleave their
/// effects, while `check_upkeep` and the read accessors may be polled
/// concurrently. The oracle request and the payout happen under the write
/// guard, keeping each operation atomic with respect to the shared state.
pub struct RaffleEngine {
    raffle: RwLock<Raffle>,
    config: RaffleConfig,
    oracle: RandomnessSourceBox,
    ledger: PrizeLedgerBox,
    events: EventSinkBox,
    store: RaffleStoreBox,
    clock: ClockBox,
}

impl RaffleEngine {
    /// Creates a new engine, resuming from a stored snapshot when one exists.
    ///
    /// A resumed raffle keeps the fee and interval it was created with; a
    /// fresh raffle takes them from `config` and is persisted immediately.
    pub async fn new(
        config: RaffleConfig,
        oracle: RandomnessSourceBox,
        ledger: PrizeLedgerBox,
        events: EventSinkBox,
        store: RaffleStoreBox,
        clock: ClockBox,
    ) -> Result<Self> {
        let raffle = match store.load().await? {
            Some(raffle) => raffle,
            None => {
                let raffle = Raffle::new(&config, clock.now_unix());
                store.save(&raffle).await?;
                raffle
            }
        };
        Ok(Self {
            raffle: RwLock::new(raffle),
            config,
            oracle,
            ledger,
            events,
            store,
            clock,
        })
    }

    /// Records an entry for `participant` paying `contribution` into the pool.
    pub async fn enter(&self, participant: ParticipantId, contribution: Balance) -> Result<()> {
        let mut raffle = self.raffle.write().await;
        raffle.enter(participant.clone(), contribution)?;
        self.store.save(&raffle).await?;
        self.events
            .publish(RaffleEvent::Entered { participant })
            .await
    }

    /// Evaluates the upkeep predicate. Read-only and idempotent.
    pub async fn check_upkeep(&self) -> bool {
        self.upkeep_status().await.needed()
    }

    /// Full four-component snapshot behind `check_upkeep`.
    pub async fn upkeep_status(&self) -> UpkeepStatus {
        let raffle = self.raffle.read().await;
        raffle.upkeep_status(self.clock.now_unix())
    }

    /// Starts a draw: re-checks the predicate, requests randomness from the
    /// oracle, and parks the round in `Calculating` until the fulfillment
    /// callback arrives. No funds move here.
    pub async fn perform_upkeep(&self) -> Result<RequestId> {
        let mut raffle = self.raffle.write().await;
        let now = self.clock.now_unix();
        let status = raffle.upkeep_status(now);
        if !status.needed() {
            return Err(RaffleError::UpkeepNotNeeded(status));
        }

        let request_id = self
            .oracle
            .request_randomness(&self.config.randomness)
            .await?;
        raffle.begin_drawing(now, request_id)?;
        self.store.save(&raffle).await?;
        self.events
            .publish(RaffleEvent::UpkeepPerformed { request_id })
            .await?;
        Ok(request_id)
    }

    /// Oracle callback: settles the round identified by `request_id`.
    ///
    /// The first random word selects the winner; the whole pool is paid out
    /// through the ledger before any state is touched, so a failed transfer
    /// leaves the round intact and retryable.
    pub async fn fulfill_randomness(
        &self,
        request_id: RequestId,
        words: &[u64],
    ) -> Result<ParticipantId> {
        let mut raffle = self.raffle.write().await;
        raffle.verify_request(request_id)?;

        let word = words.first().copied().ok_or_else(|| {
            RaffleError::Validation("fulfillment carried no random words".to_string())
        })?;
        let winner = raffle.winner_for(word)?;
        let prize = raffle.pool();

        self.ledger
            .pay(&winner, prize)
            .await
            .map_err(|e| RaffleError::PayoutFailed {
                winner: winner.clone(),
                amount: prize,
                reason: e.to_string(),
            })?;

        raffle.complete_round(winner.clone(), self.clock.now_unix());
        self.store.save(&raffle).await?;
        self.events
            .publish(RaffleEvent::WinnerPicked {
                winner: winner.clone(),
            })
            .await?;
        Ok(winner)
    }

    pub async fn state(&self) -> RaffleState {
        self.raffle.read().await.state()
    }

    pub async fn entrance_fee(&self) -> Balance {
        self.raffle.read().await.entrance_fee()
    }

    pub async fn interval_secs(&self) -> u64 {
        self.raffle.read().await.interval_secs()
    }

    pub async fn pool(&self) -> Balance {
        self.raffle.read().await.pool()
    }

    pub async fn entrant_count(&self) -> usize {
        self.raffle.read().await.entrant_count()
    }

    pub async fn entrant(&self, index: usize) -> Option<ParticipantId> {
        self.raffle.read().await.entrant(index).cloned()
    }

    pub async fn last_round_timestamp(&self) -> u64 {
        self.raffle.read().await.last_timestamp()
    }

    pub async fn pending_request(&self) -> Option<RequestId> {
        self.raffle.read().await.pending_request()
    }

    pub async fn recent_winner(&self) -> Option<ParticipantId> {
        self.raffle.read().await.recent_winner().cloned()
    }

    pub fn randomness_params(&self) -> RandomnessParams {
        self.config.randomness
    }

    /// Clone of the current aggregate, for inspection and reporting.
    pub async fn snapshot(&self) -> Raffle {
        self.raffle.read().await.clone()
    }
}
