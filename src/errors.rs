use rust_decimal::Decimal;
use thiserror::Error;

/// The check a record line failed, in the order the validator runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Reason {
    #[error("line is too short: {len} bytes, at least {min} required")]
    TooShort { len: usize, min: usize },

    #[error("first field should be sign '+' or '-'")]
    InvalidSign,

    #[error("separator for fields should be '|'")]
    InvalidSeparator,

    #[error("separator after category field not found")]
    MissingCategorySeparator,

    #[error("separator after amount field not found")]
    MissingAmountSeparator,

    #[error("category should consist of digits only")]
    InvalidCategory,

    #[error("amount should consist of digits and point or comma only")]
    InvalidAmount,

    #[error("date should consist of digits only")]
    InvalidDateDigits,

    #[error("separator for date should be '.'")]
    InvalidDateSeparator,

    #[error("invalid number of day: {0}")]
    DayOutOfRange(u32),

    #[error("invalid number of month: {0}")]
    MonthOutOfRange(u32),

    #[error("invalid number of year, year should be more than 0")]
    YearIsZero,

    #[error("invalid day of february: {day}.{month}")]
    LeapDayOutOfRange { day: u32, month: u32 },

    #[error("invalid day of month: {day}.{month}")]
    DayOutOfRangeForMonth { day: u32, month: u32 },

    #[error("date in future: {day:02}.{month:02}.{year:04}")]
    DateInFuture { day: u32, month: u32, year: i32 },

    #[error("amount is not a number")]
    UnparsableAmount,
}

/// A rejected line together with the line number it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{line}: {reason}")]
pub struct ValidationError {
    pub line: u64,
    pub reason: Reason,
}

impl ValidationError {
    pub fn new(line: u64, reason: Reason) -> Self {
        Self { line, reason }
    }
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("value overflow while adding {0}")]
    ValueOverflow(Decimal),

    #[error("too many wrong lines in database: {0}")]
    TooManyWrongLines(usize),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot get value for $HOME variable")]
    NoHomeDir,

    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),
}
