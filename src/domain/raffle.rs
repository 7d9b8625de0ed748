use super::config::RaffleConfig;
use super::money::Balance;
use crate::error::{RaffleError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of one raffle participant.
///
/// The same identity may occupy several entry slots; each slot is an
/// independent entry with its own chance of winning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an in-flight randomness request.
///
/// Binds an oracle callback to the request that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RaffleState {
    Open,
    Calculating,
}

impl fmt::Display for RaffleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaffleState::Open => write!(f, "open"),
            RaffleState::Calculating => write!(f, "calculating"),
        }
    }
}

/// Snapshot of the four upkeep predicate components.
///
/// Upkeep is needed iff the raffle is open, has entrants, holds a prize, and
/// the configured interval has elapsed since the last round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpkeepStatus {
    pub state: RaffleState,
    pub entrants: usize,
    pub pool: Balance,
    pub elapsed_secs: u64,
    pub interval_secs: u64,
}

impl UpkeepStatus {
    pub fn needed(&self) -> bool {
        self.state == RaffleState::Open
            && self.entrants > 0
            && self.pool > Balance::ZERO
            && self.elapsed_secs >= self.interval_secs
    }
}

impl fmt::Display for UpkeepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "state: {}, entrants: {}, pool: {}, elapsed: {}s of {}s",
            self.state, self.entrants, self.pool, self.elapsed_secs, self.interval_secs
        )
    }
}

/// The raffle aggregate: a cyclic state machine over entries, the prize pool,
/// and the in-flight randomness request.
///
/// All methods are synchronous and free of I/O; every failure leaves the
/// aggregate exactly as it was. Timestamps are unix seconds supplied by the
/// caller so the state machine itself stays deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Raffle {
    state: RaffleState,
    entrants: Vec<ParticipantId>,
    pool: Balance,
    entrance_fee: Balance,
    interval_secs: u64,
    last_timestamp: u64,
    pending_request: Option<RequestId>,
    recent_winner: Option<ParticipantId>,
}

impl Raffle {
    pub fn new(config: &RaffleConfig, now: u64) -> Self {
        Self {
            state: RaffleState::Open,
            entrants: Vec::new(),
            pool: Balance::ZERO,
            entrance_fee: config.entrance_fee.into(),
            interval_secs: config.interval_secs,
            last_timestamp: now,
            pending_request: None,
            recent_winner: None,
        }
    }

    /// Records one entry.
    ///
    /// Fails with `NotOpen` while a draw is in progress and with
    /// `InsufficientFunds` for any contribution below the entrance fee.
    pub fn enter(&mut self, participant: ParticipantId, contribution: Balance) -> Result<()> {
        if self.state != RaffleState::Open {
            return Err(RaffleError::NotOpen);
        }
        if contribution < self.entrance_fee {
            return Err(RaffleError::InsufficientFunds {
                required: self.entrance_fee,
                offered: contribution,
            });
        }
        self.entrants.push(participant);
        self.pool += contribution;
        Ok(())
    }

    /// Evaluates the upkeep predicate without side effects; safe to poll.
    pub fn upkeep_status(&self, now: u64) -> UpkeepStatus {
        UpkeepStatus {
            state: self.state,
            entrants: self.entrants.len(),
            pool: self.pool,
            elapsed_secs: now.saturating_sub(self.last_timestamp),
            interval_secs: self.interval_secs,
        }
    }

    /// Transitions the round into `Calculating` and records the request that
    /// will resolve it. The predicate is re-evaluated here so a caller acting
    /// on a stale check cannot force the transition.
    pub fn begin_drawing(&mut self, now: u64, request_id: RequestId) -> Result<()> {
        let status = self.upkeep_status(now);
        if !status.needed() {
            return Err(RaffleError::UpkeepNotNeeded(status));
        }
        self.state = RaffleState::Calculating;
        self.pending_request = Some(request_id);
        Ok(())
    }

    /// Checks that a fulfillment callback matches the pending request.
    pub fn verify_request(&self, request_id: RequestId) -> Result<()> {
        match self.pending_request {
            Some(pending) if pending == request_id => Ok(()),
            _ => Err(RaffleError::UnrecognizedRequest(request_id)),
        }
    }

    /// Selects the winning entrant for a random word: index = word mod the
    /// entrant count. The word domain is much larger than any realistic
    /// entrant count, so the modulo bias for non-power-of-two populations is
    /// negligible and accepted.
    pub fn winner_for(&self, word: u64) -> Result<ParticipantId> {
        if self.entrants.is_empty() {
            return Err(RaffleError::Validation(
                "cannot select a winner without entrants".to_string(),
            ));
        }
        let index = (word % self.entrants.len() as u64) as usize;
        Ok(self.entrants[index].clone())
    }

    /// Resets the round after a successful payout: entrants and pool are
    /// cleared together, the timestamp advances, and the raffle reopens.
    pub fn complete_round(&mut self, winner: ParticipantId, now: u64) {
        self.entrants.clear();
        self.pool = Balance::ZERO;
        self.last_timestamp = now;
        self.pending_request = None;
        self.recent_winner = Some(winner);
        self.state = RaffleState::Open;
    }

    pub fn state(&self) -> RaffleState {
        self.state
    }

    pub fn entrance_fee(&self) -> Balance {
        self.entrance_fee
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval_secs
    }

    pub fn pool(&self) -> Balance {
        self.pool
    }

    pub fn entrant_count(&self) -> usize {
        self.entrants.len()
    }

    pub fn entrant(&self, index: usize) -> Option<&ParticipantId> {
        self.entrants.get(index)
    }

    pub fn last_timestamp(&self) -> u64 {
        self.last_timestamp
    }

    pub fn pending_request(&self) -> Option<RequestId> {
        self.pending_request
    }

    pub fn recent_winner(&self) -> Option<&ParticipantId> {
        self.recent_winner.as_ref()
    }
}
