use crate::{
    errors::LedgerError,
    models::{Record, Sign, Summary},
    traits::{Accounting, SummaryExport, SummaryWrite},
};
use anyhow::Result;
use rust_decimal::Decimal;

#[derive(Debug, Default)]
pub struct Accountant {
    profit: Decimal,
    cost: Decimal,
    lines_read: u64,
    records: u64,
}

impl Accountant {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Accounting for Accountant {
    fn count_line(&mut self) {
        self.lines_read += 1;
    }

    fn apply_record(&mut self, record: &Record) -> Result<()> {
        let amount = *record.amount();
        let total = match record.sign() {
            Sign::Profit => &mut self.profit,
            Sign::Cost => &mut self.cost,
        };

        *total = total
            .checked_add(amount)
            .ok_or(LedgerError::ValueOverflow(amount))?;
        self.records += 1;

        Ok(())
    }
}

impl SummaryExport for Accountant {
    fn summary(&self) -> Summary {
        Summary::new(self.lines_read, self.records, self.profit, self.cost)
    }

    fn export(&self, writer: &mut impl SummaryWrite) -> Result<()> {
        writer.write_summary(&self.summary())
    }
}
