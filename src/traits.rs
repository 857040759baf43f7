use anyhow::Result;

use crate::models::{Record, Summary};

/// SummaryWrite trait provides a method to render the totals of a data file.
pub trait SummaryWrite {
    /// Writes the summary to the underlying output.
    ///
    /// # Arguments
    /// * `summary` - The totals to render.
    ///
    /// # Returns
    /// A Result indicating success or failure.
    fn write_summary(&mut self, summary: &Summary) -> Result<()>;
}

/// SummaryExport trait provides a method to export accumulated totals.
pub trait SummaryExport {
    /// Returns the totals accumulated so far.
    fn summary(&self) -> Summary;

    /// Exports the current summary.
    ///
    /// # Arguments
    /// * `writer` - The writer to render the summary with.
    ///
    /// # Returns
    /// A Result indicating success or failure.
    fn export(&self, writer: &mut impl SummaryWrite) -> Result<()>;
}

/// Accounting trait provides methods to fold records into running totals.
pub trait Accounting {
    /// Counts one physical line of the data file, valid or not.
    fn count_line(&mut self);

    /// Adds a validated record to the totals selected by its sign.
    ///
    /// # Arguments
    /// * `record` - The record to book.
    ///
    /// # Returns
    /// A Result indicating success or failure.
    fn apply_record(&mut self, record: &Record) -> Result<()>;
}
