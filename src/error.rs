use crate::domain::money::Balance;
use crate::domain::raffle::{ParticipantId, RequestId, UpkeepStatus};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RaffleError>;

#[derive(Error, Debug)]
pub enum RaffleError {
    #[error("contribution of {offered} is below the {required} entrance fee")]
    InsufficientFunds { required: Balance, offered: Balance },
    #[error("the raffle is not open for entries")]
    NotOpen,
    #[error("upkeep is not needed ({0})")]
    UpkeepNotNeeded(UpkeepStatus),
    #[error("randomness request {0} does not match the pending request")]
    UnrecognizedRequest(RequestId),
    #[error("payout of {amount} to {winner} failed: {reason}")]
    PayoutFailed {
        winner: ParticipantId,
        amount: Balance,
        reason: String,
    },
    #[error("randomness request failed: {0}")]
    Oracle(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}
