//! Record line validation.
//!
//! A record line looks like `SIGN|DD.MM.YYYY|CATEGORY|AMOUNT|COMMENT`. The
//! line is first cut into fields, then every field is checked by its own
//! rule. Checks run in a fixed order and the first failing one is reported.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::{
    errors::{Reason, ValidationError},
    models::{FormatVersion, Record, Sign},
};

const FIELD_SEPARATOR: char = '|';
const DATE_SEPARATOR: u8 = b'.';
const DATE_LEN: usize = 10;
/// Offset of the first byte after the date field and its separator.
const TAIL_OFFSET: usize = 2 + DATE_LEN + 1;

/// True if `year` is a leap year: every 4 years, except every 100th
/// which isn't, except every 400th which is.
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidatorConfig {
    pub format: FormatVersion,
    /// Reject day 31 in April, June, September and November. Off by default,
    /// which keeps accepting the same lines existing data files were written with.
    pub strict_month_lengths: bool,
}

/// Raw slices of a line, cut at the field separators.
struct Fields<'a> {
    sign: Sign,
    date: &'a [u8],
    category: Option<&'a str>,
    amount: &'a str,
    comment: &'a str,
}

impl<'a> Fields<'a> {
    fn split(line: &'a str, format: FormatVersion) -> Result<Self, Reason> {
        let bytes = line.as_bytes();
        let min = format.min_len();
        if bytes.len() < min {
            return Err(Reason::TooShort {
                len: bytes.len(),
                min,
            });
        }

        let sign = Sign::from_byte(bytes[0]).ok_or(Reason::InvalidSign)?;

        if bytes[1] != FIELD_SEPARATOR as u8 || bytes[TAIL_OFFSET - 1] != FIELD_SEPARATOR as u8 {
            return Err(Reason::InvalidSeparator);
        }

        let tail = &line[TAIL_OFFSET..];
        let (category, tail) = match format {
            FormatVersion::Categorized => {
                let (category, tail) = tail
                    .split_once(FIELD_SEPARATOR)
                    .ok_or(Reason::MissingCategorySeparator)?;
                (Some(category), tail)
            }
            FormatVersion::Legacy => (None, tail),
        };
        let (amount, comment) = tail
            .split_once(FIELD_SEPARATOR)
            .ok_or(Reason::MissingAmountSeparator)?;

        Ok(Fields {
            sign,
            date: &bytes[2..2 + DATE_LEN],
            category,
            amount,
            comment,
        })
    }
}

fn parse_category(field: &str) -> Result<u64, Reason> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Reason::InvalidCategory);
    }
    field.parse::<u64>().map_err(|_| Reason::InvalidCategory)
}

fn check_amount(field: &str) -> Result<(), Reason> {
    if field.is_empty()
        || !field
            .bytes()
            .all(|b| b.is_ascii_digit() || b == b'.' || b == b',')
    {
        return Err(Reason::InvalidAmount);
    }
    Ok(())
}

/// Comma is read as a decimal point.
fn parse_amount(field: &str) -> Result<Decimal, Reason> {
    Decimal::from_str(&field.replace(',', ".")).map_err(|_| Reason::UnparsableAmount)
}

fn digits(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
}

/// Splits `DD.MM.YYYY` into `(day, month, year)` without range checks.
fn parse_date(date: &[u8]) -> Result<(u32, u32, i32), Reason> {
    let digit_offsets = [0, 1, 3, 4, 6, 7, 8, 9];
    if !digit_offsets.iter().all(|&i| date[i].is_ascii_digit()) {
        return Err(Reason::InvalidDateDigits);
    }
    if date[2] != DATE_SEPARATOR || date[5] != DATE_SEPARATOR {
        return Err(Reason::InvalidDateSeparator);
    }

    let day = digits(&date[0..2]);
    let month = digits(&date[3..5]);
    // four digits always fit
    let year = digits(&date[6..10]) as i32;
    Ok((day, month, year))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RecordValidator {
    config: ValidatorConfig,
}

impl RecordValidator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// Validates one record line and extracts its fields.
    ///
    /// # Arguments
    /// * `line` - The line without its terminator.
    /// * `line_no` - Position of the line in the data file, carried in the error.
    /// * `today` - Records dated after this day are rejected. `None` skips the check.
    ///
    /// # Returns
    /// The parsed record, or the first check the line failed.
    pub fn validate(
        &self,
        line: &str,
        line_no: u64,
        today: Option<NaiveDate>,
    ) -> Result<Record, ValidationError> {
        self.check(line, today)
            .map_err(|reason| ValidationError::new(line_no, reason))
    }

    fn check(&self, line: &str, today: Option<NaiveDate>) -> Result<Record, Reason> {
        let fields = Fields::split(line, self.config.format)?;

        let category = fields.category.map(parse_category).transpose()?;
        check_amount(fields.amount)?;

        let (day, month, year) = parse_date(fields.date)?;
        self.check_calendar(day, month, year)?;

        if let Some(today) = today {
            if (year, month, day) > (today.year(), today.month(), today.day()) {
                return Err(Reason::DateInFuture { day, month, year });
            }
        }

        let amount = parse_amount(fields.amount)?;

        Ok(Record::new(
            fields.sign,
            (day, month, year),
            category,
            amount,
            fields.comment,
        ))
    }

    fn check_calendar(&self, day: u32, month: u32, year: i32) -> Result<(), Reason> {
        if day == 0 || day > 31 {
            return Err(Reason::DayOutOfRange(day));
        }
        if month == 0 || month > 12 {
            return Err(Reason::MonthOutOfRange(month));
        }
        if year == 0 {
            return Err(Reason::YearIsZero);
        }

        if month == 2 {
            let last = if is_leap_year(year) { 29 } else { 28 };
            if day > last {
                return Err(Reason::LeapDayOutOfRange { day, month });
            }
        }

        if self.config.strict_month_lengths && matches!(month, 4 | 6 | 9 | 11) && day > 30 {
            return Err(Reason::DayOutOfRangeForMonth { day, month });
        }

        Ok(())
    }
}

/// Validates a line in the categorized format with default settings.
pub fn validate(
    line: &str,
    line_no: u64,
    today: Option<NaiveDate>,
) -> Result<Record, ValidationError> {
    RecordValidator::default().validate(line, line_no, today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use rstest::rstest;
    use rust_decimal::prelude::*;

    fn today() -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2025, 1, 1)
    }

    fn reason(line: &str) -> Option<Reason> {
        validate(line, 1, today()).err().map(|e| e.reason)
    }

    #[test]
    fn test_valid_line_is_extracted() -> Result<()> {
        let record = validate("+|01.01.2020|5|100.50|salary", 1, today())?;
        assert_eq!(record.sign(), Sign::Profit);
        assert_eq!(record.day(), 1);
        assert_eq!(record.month(), 1);
        assert_eq!(record.year(), 2020);
        assert_eq!(record.category(), Some(5));
        assert_eq!(*record.amount(), dec!(100.50));
        assert_eq!(record.comment(), "salary");
        Ok(())
    }

    #[test]
    fn test_error_carries_line_number() {
        let err = validate("-|15.13.2020|2|50|rent", 42, today()).err();
        assert_eq!(
            err,
            Some(ValidationError::new(42, Reason::MonthOutOfRange(13)))
        );
    }

    #[rstest]
    #[case("", Reason::TooShort { len: 0, min: 18 })]
    #[case("+|01.01.2020|1|1", Reason::TooShort { len: 16, min: 18 })]
    #[case("*|01.01.2020|1|10|x", Reason::InvalidSign)]
    #[case("+/01.01.2020|1|10|x", Reason::InvalidSeparator)]
    #[case("+|01.01.2020/1|10|x", Reason::InvalidSeparator)]
    #[case("+|01.01.2020|1234567890", Reason::MissingCategorySeparator)]
    #[case("+|01.01.2020|1|100000", Reason::MissingAmountSeparator)]
    #[case("+|01.01.2020|a|10|xyz", Reason::InvalidCategory)]
    #[case("+|01.01.2020||10|xyzw", Reason::InvalidCategory)]
    #[case("+|01.01.2020|1|10x|x", Reason::InvalidAmount)]
    #[case("+|01.01.2020|1||xyzwv", Reason::InvalidAmount)]
    #[case("+|0a.01.2020|1|10|xyz", Reason::InvalidDateDigits)]
    #[case("+|01-01.2020|1|10|xyz", Reason::InvalidDateSeparator)]
    #[case("+|00.01.2020|1|10|xyz", Reason::DayOutOfRange(0))]
    #[case("+|32.01.2020|1|10|xyz", Reason::DayOutOfRange(32))]
    #[case("+|01.00.2020|1|10|xyz", Reason::MonthOutOfRange(0))]
    #[case("-|15.13.2020|2|50|rent", Reason::MonthOutOfRange(13))]
    #[case("+|01.01.0000|1|10|xyz", Reason::YearIsZero)]
    #[case("+|01.01.2099|1|10|x", Reason::DateInFuture { day: 1, month: 1, year: 2099 })]
    #[case("-|01.01.2020|3|1.2.3|lunch", Reason::UnparsableAmount)]
    fn test_rejected_lines(#[case] line: &str, #[case] expected: Reason) {
        assert_eq!(reason(line), Some(expected));
    }

    #[test]
    fn test_checks_run_in_order() {
        // bad category is reported before the bad date
        assert_eq!(reason("+|aa.01.2020|x|10|xyz"), Some(Reason::InvalidCategory));
        // bad amount is reported before the bad day
        assert_eq!(reason("+|99.01.2020|1|1a|xyz"), Some(Reason::InvalidAmount));
        // range of day is checked before range of month
        assert_eq!(reason("+|40.40.2020|1|10|xyz"), Some(Reason::DayOutOfRange(40)));
        // missing separators are reported before the field contents
        assert_eq!(
            reason("+|01.01.2020|abcdefgh"),
            Some(Reason::MissingCategorySeparator)
        );
        assert_eq!(
            reason("+|01.01.2020|a|100000"),
            Some(Reason::MissingAmountSeparator)
        );
        // date digits are checked before date separators
        assert_eq!(reason("+|0a-01.2020|1|10|xyz"), Some(Reason::InvalidDateDigits));
    }

    #[rstest]
    #[case("+|31.01.2024|1|10|xyz", None)]
    #[case("+|29.02.2024|1|10|xyz", None)]
    #[case("+|29.02.2000|1|10|xyz", None)]
    #[case("+|28.02.2023|1|10|xyz", None)]
    #[case("+|29.02.2023|1|10|xyz", Some(Reason::LeapDayOutOfRange { day: 29, month: 2 }))]
    #[case("+|29.02.1900|1|10|xyz", Some(Reason::LeapDayOutOfRange { day: 29, month: 2 }))]
    #[case("+|30.02.2024|1|10|xyz", Some(Reason::LeapDayOutOfRange { day: 30, month: 2 }))]
    fn test_calendar_boundaries(#[case] line: &str, #[case] expected: Option<Reason>) {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1);
        let got = validate(line, 1, today).err().map(|e| e.reason);
        assert_eq!(got, expected);
    }

    #[test]
    fn test_leap_year_arithmetic() {
        assert!(is_leap_year(2000));
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
    }

    #[test]
    fn test_thirty_day_months_are_not_checked_by_default() -> Result<()> {
        // 31.04 passes unless strict month lengths are requested
        let record = validate("+|31.04.2020|1|10|xyz", 1, today())?;
        assert_eq!(record.day(), 31);
        assert!(record.date().is_none());
        Ok(())
    }

    #[rstest]
    #[case("+|31.04.2020|1|10|xyz", 4)]
    #[case("+|31.06.2020|1|10|xyz", 6)]
    #[case("+|31.09.2020|1|10|xyz", 9)]
    #[case("+|31.11.2020|1|10|xyz", 11)]
    fn test_strict_month_lengths(#[case] line: &str, #[case] month: u32) {
        let validator = RecordValidator::new(ValidatorConfig {
            strict_month_lengths: true,
            ..Default::default()
        });
        let got = validator.validate(line, 1, today()).err().map(|e| e.reason);
        assert_eq!(got, Some(Reason::DayOutOfRangeForMonth { day: 31, month }));
    }

    #[test]
    fn test_strict_month_lengths_accepts_thirtieth() -> Result<()> {
        let validator = RecordValidator::new(ValidatorConfig {
            strict_month_lengths: true,
            ..Default::default()
        });
        validator.validate("+|30.04.2020|1|10|xyz", 1, today())?;
        validator.validate("+|31.12.2020|1|10|xyz", 1, today())?;
        Ok(())
    }

    #[test]
    fn test_future_date_boundary() -> Result<()> {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15);
        validate("+|15.03.2024|1|10|xyz", 1, today)?;
        let got = validate("+|16.03.2024|1|10|xyz", 1, today).err().map(|e| e.reason);
        assert_eq!(
            got,
            Some(Reason::DateInFuture {
                day: 16,
                month: 3,
                year: 2024
            })
        );
        let got = validate("+|01.04.2024|1|10|xyz", 1, today).err().map(|e| e.reason);
        assert!(matches!(got, Some(Reason::DateInFuture { .. })));
        Ok(())
    }

    #[test]
    fn test_unknown_today_skips_future_check() -> Result<()> {
        let record = validate("+|01.01.2099|1|10|x", 1, None)?;
        assert_eq!(record.year(), 2099);
        Ok(())
    }

    #[test]
    fn test_comma_is_read_as_decimal_point() -> Result<()> {
        let record = validate("-|01.01.2020|3|12,50|lunch", 1, today())?;
        assert_eq!(record.sign(), Sign::Cost);
        assert_eq!(*record.amount(), dec!(12.5));
        Ok(())
    }

    #[test]
    fn test_comment_keeps_separators_and_unicode() -> Result<()> {
        let record = validate("+|01.01.2020|1|10|a|b", 1, today())?;
        assert_eq!(record.comment(), "a|b");

        let record = validate("-|02.03.2021|4|7|кофе", 1, today())?;
        assert_eq!(record.comment(), "кофе");
        Ok(())
    }

    #[test]
    fn test_oversized_category_is_rejected() {
        assert_eq!(
            reason("+|01.01.2020|99999999999999999999999|10|x"),
            Some(Reason::InvalidCategory)
        );
    }

    #[test]
    fn test_legacy_format() -> Result<()> {
        let validator = RecordValidator::new(ValidatorConfig {
            format: FormatVersion::Legacy,
            ..Default::default()
        });

        let record = validator.validate("+|01.01.2020|1|", 1, today())?;
        assert_eq!(record.category(), None);
        assert_eq!(*record.amount(), dec!(1));
        assert_eq!(record.comment(), "");

        let got = validator
            .validate("+|01.01.2020|100", 1, today())
            .err()
            .map(|e| e.reason);
        assert_eq!(got, Some(Reason::MissingAmountSeparator));

        let got = validator
            .validate("+|01.01.2020|", 1, today())
            .err()
            .map(|e| e.reason);
        assert_eq!(got, Some(Reason::TooShort { len: 13, min: 15 }));
        Ok(())
    }

    #[test]
    fn test_validation_is_idempotent() {
        let lines = [
            "+|01.01.2020|5|100.50|salary",
            "-|15.13.2020|2|50|rent",
            "+|01.01.2099|1|10|x",
        ];
        for line in lines {
            assert_eq!(validate(line, 3, today()), validate(line, 3, today()));
        }
    }

    #[test]
    fn test_displayed_record_validates_to_same_record() -> Result<()> {
        let lines = [
            "+|01.01.2020|5|100.50|salary",
            "-|29.02.2024|17|3,75|coffee, large",
        ];
        for line in lines {
            let record = validate(line, 1, NaiveDate::from_ymd_opt(2025, 1, 1))?;
            let again = validate(&record.to_string(), 1, NaiveDate::from_ymd_opt(2025, 1, 1))?;
            assert_eq!(record, again);
        }
        Ok(())
    }
}
