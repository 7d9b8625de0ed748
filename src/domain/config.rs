use super::money::Amount;
use serde::{Deserialize, Serialize};

/// Parameters forwarded to the randomness oracle with every request.
///
/// Only the first returned word is consumed by winner selection; `num_words`
/// exists so the request contract matches what the oracle expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomnessParams {
    /// Confirmations the oracle should wait for before answering.
    pub confirmations: u16,
    /// Compute budget granted to the fulfillment callback.
    pub callback_gas_limit: u64,
    /// Number of random words requested.
    pub num_words: u32,
}

impl Default for RandomnessParams {
    fn default() -> Self {
        Self {
            confirmations: 3,
            callback_gas_limit: 500_000,
            num_words: 1,
        }
    }
}

/// Immutable raffle configuration, fixed at construction time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaffleConfig {
    /// Minimum contribution required to enter.
    pub entrance_fee: Amount,
    /// Minimum seconds between rounds.
    pub interval_secs: u64,
    /// Request parameters for the randomness oracle.
    pub randomness: RandomnessParams,
}

impl RaffleConfig {
    pub fn new(entrance_fee: Amount, interval_secs: u64, randomness: RandomnessParams) -> Self {
        Self {
            entrance_fee,
            interval_secs,
            randomness,
        }
    }
}
