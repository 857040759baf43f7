use chrono::NaiveDate;
use getset::{CopyGetters, Getters};
use rust_decimal::{RoundingStrategy, prelude::*};
use serde::Serialize;
use std::fmt;

/// Formats an amount with two decimals, half away from zero.
pub(crate) fn money(x: &Decimal) -> String {
    let x = x.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{x:.2}")
}

fn round_two_decimals<S>(x: &Decimal, s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    s.serialize_str(&money(x))
}

/// Polarity of a record: `+` for profit, `-` for cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Profit,
    Cost,
}

impl Sign {
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'+' => Some(Sign::Profit),
            b'-' => Some(Sign::Cost),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Sign::Profit => '+',
            Sign::Cost => '-',
        }
    }
}

/// Layout of a record line.
///
/// `Legacy` is `SIGN|DD.MM.YYYY|AMOUNT|COMMENT`, `Categorized` adds a numeric
/// category between the date and the amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormatVersion {
    Legacy,
    #[default]
    Categorized,
}

impl FormatVersion {
    pub fn min_len(self) -> usize {
        match self {
            FormatVersion::Legacy => 15,
            FormatVersion::Categorized => 18,
        }
    }
}

/// A line that passed every check.
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters)]
pub struct Record {
    #[getset(get_copy = "pub")]
    sign: Sign,
    #[getset(get_copy = "pub")]
    day: u32,
    #[getset(get_copy = "pub")]
    month: u32,
    #[getset(get_copy = "pub")]
    year: i32,
    #[getset(get_copy = "pub")]
    category: Option<u64>,
    #[getset(get = "pub")]
    amount: Decimal,
    #[getset(get = "pub")]
    comment: String,
}

impl Record {
    pub(crate) fn new(
        sign: Sign,
        (day, month, year): (u32, u32, i32),
        category: Option<u64>,
        amount: Decimal,
        comment: &str,
    ) -> Self {
        Record {
            sign,
            day,
            month,
            year,
            category,
            amount,
            comment: comment.to_owned(),
        }
    }

    /// Calendar date of the record, `None` for dates chrono rejects
    /// (such as 31.04 which the line format lets through).
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{:02}.{:02}.{:04}|",
            self.sign.as_char(),
            self.day,
            self.month,
            self.year
        )?;
        if let Some(category) = self.category {
            write!(f, "{category}|")?;
        }
        write!(f, "{}|{}", self.amount, self.comment)
    }
}

/// Totals over one data file.
#[derive(Debug, Clone, PartialEq, Serialize, Getters, CopyGetters)]
pub struct Summary {
    #[getset(get_copy = "pub")]
    lines_read: u64,
    #[getset(get_copy = "pub")]
    records: u64,
    #[getset(get = "pub")]
    #[serde(serialize_with = "round_two_decimals")]
    profit: Decimal,
    #[getset(get = "pub")]
    #[serde(serialize_with = "round_two_decimals")]
    cost: Decimal,
    #[getset(get = "pub")]
    #[serde(serialize_with = "round_two_decimals")]
    balance: Decimal,
}

impl Summary {
    pub fn new(lines_read: u64, records: u64, profit: Decimal, cost: Decimal) -> Self {
        Summary {
            lines_read,
            records,
            profit,
            cost,
            balance: profit - cost,
        }
    }
}
