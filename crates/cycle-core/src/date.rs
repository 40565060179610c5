//! Date-only calendar values.
//!
//! Every date that enters the engine passes through [`CalendarDate::parse`];
//! the rest of the crate never touches raw strings. Date-times are reduced to
//! the calendar date exactly as written so that a stored `2024-03-01T23:30:00-05:00`
//! stays March 1st instead of drifting a day when converted to UTC.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Years accepted at the parse boundary.
const SUPPORTED_YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

/// Error returned when a string is not a recognisable calendar date.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid calendar date: {input:?}")]
pub struct DateParseError {
    input: String,
}

/// A calendar date without time or timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Creates a date from year, month and day, if they form a real date
    /// within years 1 to 9999.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).and_then(Self::supported)
    }

    /// Parses `YYYY-MM-DD`, or an ISO 8601 date-time whose date part is kept.
    ///
    /// Surrounding whitespace is ignored. Years outside 1 to 9999 are
    /// rejected even when chrono can represent them.
    pub fn parse(input: &str) -> Result<Self, DateParseError> {
        let trimmed = input.trim();

        parse_naive(trimmed)
            .and_then(Self::supported)
            .ok_or_else(|| DateParseError {
                input: input.to_string(),
            })
    }

    fn supported(date: NaiveDate) -> Option<Self> {
        SUPPORTED_YEARS.contains(&date.year()).then_some(Self(date))
    }

    /// Returns the date `days` later (or earlier, when negative).
    ///
    /// Saturates at the ends of chrono's date range instead of overflowing.
    #[must_use]
    pub fn add_days(self, days: i64) -> Self {
        let shifted = Duration::try_days(days).and_then(|delta| self.0.checked_add_signed(delta));
        match shifted {
            Some(date) => Self(date),
            None if days < 0 => Self(NaiveDate::MIN),
            None => Self(NaiveDate::MAX),
        }
    }

    /// Number of days from `earlier` to `self`.
    pub fn days_since(self, earlier: Self) -> i64 {
        i64::from(self.0.num_days_from_ce()) - i64::from(earlier.0.num_days_from_ce())
    }

    /// Returns the underlying chrono date.
    pub const fn as_naive(self) -> NaiveDate {
        self.0
    }
}

fn parse_naive(input: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(input, DATE_FORMAT) {
        return Some(date);
    }

    // Keep the local calendar date of an offset timestamp.
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.date_naive());
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .into_iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .map(|dt| dt.date())
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for CalendarDate {
    type Err = DateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for CalendarDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> CalendarDate {
        CalendarDate::parse(s).unwrap()
    }

    #[test]
    fn parses_plain_iso_date() {
        assert_eq!(date("2024-01-29"), CalendarDate::from_ymd(2024, 1, 29).unwrap());
        assert_eq!(date("  2024-01-29 "), CalendarDate::from_ymd(2024, 1, 29).unwrap());
    }

    #[test]
    fn keeps_written_date_of_offset_timestamp() {
        // 23:30 at -05:00 is already the next day in UTC.
        assert_eq!(
            date("2024-03-01T23:30:00-05:00"),
            CalendarDate::from_ymd(2024, 3, 1).unwrap()
        );
        assert_eq!(
            date("2024-03-01T00:15:00+09:00"),
            CalendarDate::from_ymd(2024, 3, 1).unwrap()
        );
    }

    #[test]
    fn parses_naive_datetime_forms() {
        assert_eq!(
            date("2024-03-01T10:00:00"),
            CalendarDate::from_ymd(2024, 3, 1).unwrap()
        );
        assert_eq!(
            date("2024-03-01 10:00:00.250"),
            CalendarDate::from_ymd(2024, 3, 1).unwrap()
        );
    }

    #[test]
    fn rejects_malformed_dates() {
        for input in ["", "not-a-date", "2024-02-30", "2024-13-01", "01/02/2024"] {
            assert!(CalendarDate::parse(input).is_err(), "{input} should fail");
        }
    }

    #[test]
    fn day_arithmetic_crosses_month_and_leap_day() {
        assert_eq!(date("2024-02-26").add_days(28), date("2024-03-25"));
        assert_eq!(date("2024-03-01").add_days(-1), date("2024-02-29"));
        assert_eq!(date("2024-03-25").days_since(date("2024-02-26")), 28);
        assert_eq!(date("2024-01-01").days_since(date("2024-01-06")), -5);
    }

    #[test]
    fn rejects_years_outside_supported_range() {
        for input in ["+262142-12-20", "-200000-01-01", "+10000-01-01", "0000-12-31"] {
            assert!(CalendarDate::parse(input).is_err(), "{input} should fail");
        }
        assert_eq!(date("9999-12-31"), CalendarDate::from_ymd(9999, 12, 31).unwrap());
        assert_eq!(CalendarDate::from_ymd(10_000, 1, 1), None);
    }

    #[test]
    fn add_days_saturates_instead_of_overflowing() {
        let far = date("9999-12-31");
        assert_eq!(far.add_days(i64::MAX).as_naive(), NaiveDate::MAX);
        assert_eq!(far.add_days(i64::MIN).as_naive(), NaiveDate::MIN);
        assert_eq!(far.add_days(200_000 * 366).as_naive(), NaiveDate::MAX);
        assert!(far.add_days(1) > far);

        let max = far.add_days(i64::MAX);
        let min = far.add_days(i64::MIN);
        assert!(max.days_since(min) > 0);
        assert_eq!(min.days_since(max), -max.days_since(min));
    }

    #[test]
    fn serializes_as_date_only_string() {
        let d = date("2024-03-01T23:30:00-05:00");
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, "\"2024-03-01\"");
        let parsed: CalendarDate = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, d);
    }

    #[test]
    fn deserialize_rejects_garbage() {
        let result: Result<CalendarDate, _> = serde_json::from_str("\"yesterday\"");
        assert!(result.is_err());
    }
}
