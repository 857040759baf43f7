use std::{borrow::Cow, io::BufRead};

use crate::{
    errors::LedgerError,
    traits::{Accounting, SummaryExport, SummaryWrite},
    validator::RecordValidator,
};
use anyhow::Result;
use chrono::NaiveDate;
use tracing::{debug, info, trace, warn};

pub const DEFAULT_MAX_WRONG_LINES: usize = 5;

pub struct Engine<R, T, S> {
    reader: R,
    writer: T,
    accountant: S,
    validator: RecordValidator,
    today: Option<NaiveDate>,
    max_wrong_lines: usize,
}

impl<R, T, S> Engine<R, T, S>
where
    R: BufRead,
    T: SummaryWrite,
    S: SummaryExport + Accounting,
{
    pub fn new(reader: R, writer: T, accountant: S, validator: RecordValidator) -> Self {
        Self {
            reader,
            writer,
            accountant,
            validator,
            today: None,
            max_wrong_lines: DEFAULT_MAX_WRONG_LINES,
        }
    }

    /// Day after which records are rejected. Unset means the future-date check is skipped.
    pub fn with_today(mut self, today: Option<NaiveDate>) -> Self {
        self.today = today;
        self
    }

    pub fn with_max_wrong_lines(mut self, max_wrong_lines: usize) -> Self {
        self.max_wrong_lines = max_wrong_lines;
        self
    }

    pub fn accountant(&self) -> &S {
        &self.accountant
    }

    pub fn into_writer(self) -> T {
        self.writer
    }

    pub fn run(&mut self) -> Result<()> {
        self.read_records()?;
        self.accountant.export(&mut self.writer)?;
        Ok(())
    }

    fn read_records(&mut self) -> Result<()> {
        let mut buf = Vec::new();
        let mut line_no: u64 = 0;
        let mut fails: usize = 0;

        loop {
            buf.clear();
            if self.reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_no += 1;
            self.accountant.count_line();

            let bytes = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
            let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
            if bytes.is_empty() {
                continue;
            }

            // structural fields are ASCII, so only the comment can be affected
            let line = String::from_utf8_lossy(bytes);
            if let Cow::Owned(_) = line {
                debug!("{line_no}: line is not valid UTF-8, replacing invalid bytes");
            }
            trace!("{line_no}: '{line}'");

            if fails == self.max_wrong_lines {
                return Err(LedgerError::TooManyWrongLines(fails).into());
            }

            match self.validator.validate(&line, line_no, self.today) {
                Ok(record) => self.accountant.apply_record(&record)?,
                Err(err) => {
                    warn!(line = err.line, "{}", err.reason);
                    fails += 1;
                }
            }
        }

        let summary = self.accountant.summary();
        info!(
            "read {} lines and {} records from data file",
            summary.lines_read(),
            summary.records()
        );
        debug!("{fails} lines rejected");
        Ok(())
    }
}
