//! Shared utilities for CLI commands.

use anyhow::{Context, Result};
use chrono::Local;
use cycle_core::{CalendarDate, UserId};

/// Parses the `--today` flag, falling back to the local calendar date.
pub fn parse_today(value: Option<&str>) -> Result<CalendarDate> {
    match value {
        None => Ok(CalendarDate::from(Local::now().date_naive())),
        Some(s) => CalendarDate::parse(s)
            .with_context(|| format!("invalid --today date {s:?}, expected YYYY-MM-DD")),
    }
}

/// Validates the `--user` flag.
pub fn parse_user(value: &str) -> Result<UserId> {
    UserId::new(value).context("invalid --user")
}

/// Renders a day count with its unit.
pub fn days(count: i64) -> String {
    if count.abs() == 1 {
        format!("{count} day")
    } else {
        format!("{count} days")
    }
}
