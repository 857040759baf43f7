use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{BufRead, BufReader};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use openfm::{
    config::{Cli, OutputFormat, Settings, log_filter},
    ledger::Accountant,
    processor::Engine,
    traits::SummaryWrite,
    validator::RecordValidator,
    writer::{CsvWriter, TextWriter},
};

fn init_tracing(verbose: u8) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| log_filter(verbose).into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run<R: BufRead, T: SummaryWrite>(reader: R, writer: T, settings: &Settings) -> Result<()> {
    let mut engine = Engine::new(
        reader,
        writer,
        Accountant::new(),
        RecordValidator::new(settings.validator),
    )
    .with_today(settings.today)
    .with_max_wrong_lines(settings.max_wrong_lines);

    engine.run()
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = Settings::from_cli(cli)?;

    info!("open data file ({})", settings.data_file.display());
    let file = File::open(&settings.data_file)
        .with_context(|| format!("failed to open file {}", settings.data_file.display()))?;
    let reader = BufReader::new(file);

    match settings.format {
        OutputFormat::Text => run(reader, TextWriter::stdout(), &settings),
        OutputFormat::Csv => run(reader, CsvWriter::stdout(), &settings),
    }
}
