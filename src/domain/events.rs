use super::raffle::{ParticipantId, RequestId};
use serde::Serialize;
use std::fmt;

/// Notifications emitted by the engine for observers, UIs, and indexers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RaffleEvent {
    Entered { participant: ParticipantId },
    UpkeepPerformed { request_id: RequestId },
    WinnerPicked { winner: ParticipantId },
}

impl fmt::Display for RaffleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaffleEvent::Entered { participant } => write!(f, "entered: {}", participant),
            RaffleEvent::UpkeepPerformed { request_id } => {
                write!(f, "upkeep performed: request {}", request_id)
            }
            RaffleEvent::WinnerPicked { winner } => write!(f, "winner picked: {}", winner),
        }
    }
}
