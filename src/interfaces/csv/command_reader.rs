use crate::error::{RaffleError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    /// Enter the raffle: `who` pays `value` into the pool.
    Enter,
    /// Advance the simulation clock by `value` seconds.
    Advance,
    /// Report whether upkeep is needed.
    Check,
    /// Trigger upkeep (start a draw).
    Upkeep,
    /// Deliver the oracle callback for the latest request with `value` as the
    /// random word.
    Fulfill,
}

/// One simulation step read from the command stream.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct Command {
    pub op: CommandKind,
    pub who: Option<String>,
    pub value: Option<Decimal>,
}

/// Reads raffle commands from a CSV source.
///
/// This reader wraps `csv::Reader` and provides an iterator over `Result<Command>`.
/// It handles whitespace trimming and flexible record lengths automatically.
pub struct CommandReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CommandReader<R> {
    /// Creates a new `CommandReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes commands.
    pub fn commands(self) -> impl Iterator<Item = Result<Command>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(RaffleError::from))
    }
}
