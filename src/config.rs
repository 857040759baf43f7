use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use chrono::{Local, NaiveDate};
use clap::{ArgAction, Parser, ValueEnum};
use tracing::warn;

use crate::{
    errors::ConfigError,
    models::FormatVersion,
    processor::DEFAULT_MAX_WRONG_LINES,
    validator::ValidatorConfig,
};

/// Name of the data file looked up in the home directory.
pub const DATA_FILE: &str = "finance.db";

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "openfm", version, about = "Your private financial manager")]
pub struct Cli {
    /// Enable verbose mode, repeat for more detail
    #[arg(short = 'v', action = ArgAction::Count)]
    pub verbose: u8,

    /// Summary output format
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Read records without the category field
    #[arg(long = "legacy")]
    pub legacy: bool,

    /// Reject day 31 in 30-day months
    #[arg(long = "strict-month-lengths")]
    pub strict_month_lengths: bool,

    /// Abort after this many wrong lines
    #[arg(long = "max-wrong-lines", default_value_t = DEFAULT_MAX_WRONG_LINES)]
    pub max_wrong_lines: usize,

    /// Reject records after this day instead of the current date (YYYY-MM-DD)
    #[arg(long = "today", value_parser = parse_date)]
    pub today: Option<NaiveDate>,

    /// Data file (default: $HOME/finance.db)
    pub file: Option<PathBuf>,
}

fn parse_date(s: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| ConfigError::InvalidDate(s.to_owned()))
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub data_file: PathBuf,
    pub format: OutputFormat,
    pub validator: ValidatorConfig,
    pub max_wrong_lines: usize,
    pub today: Option<NaiveDate>,
}

impl Settings {
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let data_file = resolve_data_file(cli.file.as_deref(), std::env::var_os("HOME"))?;
        let format = if cli.legacy {
            FormatVersion::Legacy
        } else {
            FormatVersion::Categorized
        };

        Ok(Settings {
            data_file,
            format: cli.format,
            validator: ValidatorConfig {
                format,
                strict_month_lengths: cli.strict_month_lengths,
            },
            max_wrong_lines: cli.max_wrong_lines,
            today: cli.today.or_else(|| Some(Local::now().date_naive())),
        })
    }
}

fn is_regular_file(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

/// Picks the data file: the given path when it is a regular file, otherwise
/// `finance.db` in the home directory.
pub fn resolve_data_file(
    given: Option<&Path>,
    home: Option<OsString>,
) -> Result<PathBuf, ConfigError> {
    if let Some(path) = given {
        if is_regular_file(path) {
            return Ok(path.to_path_buf());
        }
        warn!(
            "{} isn't a regular file, using default data file",
            path.display()
        );
    }

    let home = home.ok_or(ConfigError::NoHomeDir)?;
    Ok(PathBuf::from(home).join(DATA_FILE))
}

/// Log filter for the given number of `-v` flags.
pub fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "openfm=warn",
        1 => "openfm=info",
        2 => "openfm=debug",
        _ => "openfm=trace",
    }
}
