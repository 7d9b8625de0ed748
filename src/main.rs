use clap::Parser;
use fairdraw::application::engine::RaffleEngine;
use fairdraw::domain::config::{RaffleConfig, RandomnessParams};
use fairdraw::domain::money::{Amount, Balance};
use fairdraw::domain::ports::{
    ClockBox, EventSinkBox, PrizeLedgerBox, RaffleStoreBox, RandomnessSourceBox,
};
use fairdraw::domain::raffle::ParticipantId;
use fairdraw::error::RaffleError;
use fairdraw::infrastructure::clock::ManualClock;
use fairdraw::infrastructure::in_memory::{InMemoryEventSink, InMemoryLedger, InMemoryRaffleStore};
use fairdraw::infrastructure::oracle::MockRandomnessCoordinator;
use fairdraw::interfaces::csv::command_reader::{Command, CommandKind, CommandReader};
use fairdraw::interfaces::csv::report_writer::ReportWriter;
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::fs::File;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input commands CSV file
    input: PathBuf,

    /// Entrance fee required per entry
    #[arg(long, default_value = "10")]
    entrance_fee: Decimal,

    /// Minimum seconds between rounds
    #[arg(long, default_value_t = 60)]
    interval: u64,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let fee = Amount::new(cli.entrance_fee).into_diagnostic()?;
    let config = RaffleConfig::new(fee, cli.interval, RandomnessParams::default());

    let clock = ManualClock::new();
    let coordinator = MockRandomnessCoordinator::new();
    let ledger = InMemoryLedger::new();
    let events = InMemoryEventSink::new();

    let store = match cli.db_path {
        Some(db_path) => open_store(db_path)?,
        None => Box::new(InMemoryRaffleStore::new()) as RaffleStoreBox,
    };

    let oracle: RandomnessSourceBox = Box::new(coordinator.clone());
    let prize_ledger: PrizeLedgerBox = Box::new(ledger.clone());
    let event_sink: EventSinkBox = Box::new(events.clone());
    let engine_clock: ClockBox = Box::new(clock.clone());

    let engine = RaffleEngine::new(config, oracle, prize_ledger, event_sink, store, engine_clock)
        .await
        .into_diagnostic()?;

    // Process commands
    let file = File::open(cli.input).into_diagnostic()?;
    let reader = CommandReader::new(file);
    for command_result in reader.commands() {
        match command_result {
            Ok(command) => {
                if let Err(e) = run_command(&engine, &coordinator, &clock, command).await {
                    eprintln!("Error running command: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Error reading command: {}", e);
            }
        }
    }

    // Emitted notifications, in order
    for event in events.take().await {
        eprintln!("{}", event);
    }

    // Output final ledger state
    let stdout = io::stdout();
    let mut writer = ReportWriter::new(stdout.lock());
    writer
        .write_balances(&ledger.balances().await)
        .into_diagnostic()?;

    Ok(())
}

async fn run_command(
    engine: &RaffleEngine,
    coordinator: &MockRandomnessCoordinator,
    clock: &ManualClock,
    command: Command,
) -> fairdraw::error::Result<()> {
    match command.op {
        CommandKind::Enter => {
            let who = command
                .who
                .ok_or_else(|| RaffleError::Validation("enter requires a participant".to_string()))?;
            let value = command.value.ok_or_else(|| {
                RaffleError::Validation("enter requires a contribution".to_string())
            })?;
            engine
                .enter(ParticipantId::new(who), Balance::new(value))
                .await
        }
        CommandKind::Advance => {
            let secs = command.value.and_then(|v| v.to_u64()).ok_or_else(|| {
                RaffleError::Validation("advance requires a number of seconds".to_string())
            })?;
            clock.advance(secs);
            Ok(())
        }
        CommandKind::Check => {
            eprintln!("upkeep needed: {}", engine.check_upkeep().await);
            Ok(())
        }
        CommandKind::Upkeep => engine.perform_upkeep().await.map(|_| ()),
        CommandKind::Fulfill => {
            let word = command.value.and_then(|v| v.to_u64()).ok_or_else(|| {
                RaffleError::Validation("fulfill requires a random word".to_string())
            })?;
            let request_id = coordinator.last_request().await.ok_or_else(|| {
                RaffleError::Validation("no randomness request pending".to_string())
            })?;
            engine.fulfill_randomness(request_id, &[word]).await.map(|_| ())
        }
    }
}

#[cfg(feature = "storage-rocksdb")]
fn open_store(db_path: PathBuf) -> Result<RaffleStoreBox> {
    let store = fairdraw::infrastructure::rocksdb::RocksDbStore::open(db_path).into_diagnostic()?;
    Ok(Box::new(store))
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_store(_db_path: PathBuf) -> Result<RaffleStoreBox> {
    eprintln!(
        "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
    );
    Ok(Box::new(InMemoryRaffleStore::new()))
}
