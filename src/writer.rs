use crate::{
    models::{Summary, money},
    traits::SummaryWrite,
};
use anyhow::Result;
use csv::{Writer, WriterBuilder};
use std::io::{self, Stdout, Write};

/// Renders the summary as the plain-text statistics block.
pub struct TextWriter<W: Write> {
    out: W,
}

impl TextWriter<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TextWriter<W> {
    pub fn new(out: W) -> Self {
        TextWriter { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> SummaryWrite for TextWriter<W> {
    fn write_summary(&mut self, summary: &Summary) -> Result<()> {
        writeln!(self.out, "Finance statistics:")?;
        writeln!(self.out, "Profit:  {:>8}", money(summary.profit()))?;
        writeln!(self.out, "Costs:   {:>8}", money(summary.cost()))?;
        writeln!(self.out, "Balance: {:>8}", money(summary.balance()))?;
        self.out.flush()?;
        Ok(())
    }
}

/// Renders the summary as a CSV row with a header.
pub struct CsvWriter<W: Write> {
    writer: Writer<W>,
}

impl CsvWriter<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> CsvWriter<W> {
    pub fn new(out: W) -> Self {
        CsvWriter {
            writer: WriterBuilder::new().from_writer(out),
        }
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer.into_inner().map_err(|e| e.into_error().into())
    }
}

impl<W: Write> SummaryWrite for CsvWriter<W> {
    fn write_summary(&mut self, summary: &Summary) -> Result<()> {
        self.writer.serialize(summary)?;
        self.writer.flush()?;
        Ok(())
    }
}
