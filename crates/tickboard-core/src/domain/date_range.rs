use std::fmt::{Display, Formatter};

use time::format_description::FormatItem;
use time::macros::format_description;
use time::Date;

use crate::ValidationError;

const DATE_FORMAT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Parse a `YYYY-MM-DD` calendar date from user input.
pub fn parse_date(input: &str) -> Result<Date, ValidationError> {
    Date::parse(input.trim(), DATE_FORMAT).map_err(|_| ValidationError::InvalidDate {
        value: input.to_owned(),
    })
}

/// Format a calendar date as `YYYY-MM-DD`.
pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT)
        .unwrap_or_else(|_| String::from("<unformattable>"))
}

/// Closed calendar-date range with `start <= end` enforced at construction.
///
/// A violated range is rejected before any fetch is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: Date,
    end: Date,
}

impl DateRange {
    pub fn new(start: Date, end: Date) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvalidRange {
                start: format_date(start),
                end: format_date(end),
            });
        }

        Ok(Self { start, end })
    }

    pub fn parse(start: &str, end: &str) -> Result<Self, ValidationError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    pub const fn start(&self) -> Date {
        self.start
    }

    pub const fn end(&self) -> Date {
        self.end
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    /// Unix epoch seconds at midnight UTC of the start date.
    pub fn start_unix(&self) -> i64 {
        self.start.midnight().assume_utc().unix_timestamp()
    }

    /// Unix epoch seconds at midnight UTC of the day after the end date,
    /// so the provider query covers the whole closed range.
    pub fn end_unix_exclusive(&self) -> i64 {
        self.end
            .next_day()
            .unwrap_or(self.end)
            .midnight()
            .assume_utc()
            .unix_timestamp()
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", format_date(self.start), format_date(self.end))
    }
}
