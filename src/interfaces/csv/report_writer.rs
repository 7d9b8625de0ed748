use crate::domain::money::Balance;
use crate::domain::raffle::ParticipantId;
use crate::error::Result;
use std::io::Write;

/// Writes final ledger balances as CSV.
pub struct ReportWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(target: W) -> Self {
        Self {
            writer: csv::WriterBuilder::new().from_writer(target),
        }
    }

    pub fn write_balances(&mut self, balances: &[(ParticipantId, Balance)]) -> Result<()> {
        self.writer.write_record(["participant", "balance"])?;
        for (participant, balance) in balances {
            self.writer
                .write_record([participant.as_str(), &balance.to_string()])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
