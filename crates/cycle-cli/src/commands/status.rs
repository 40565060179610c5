//! Status command for showing where a user is in their cycle.

use std::io::Write;

use anyhow::Result;
use cycle_core::{CalendarDate, CycleStatus, EngineConfig, UserId, predict_cycle};
use serde::Serialize;

use crate::commands::util::days;
use crate::store::EntryStore;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusOutput<'a> {
    user: &'a UserId,
    next_period_start: CalendarDate,
    #[serde(flatten)]
    status: &'a CycleStatus,
}

pub fn run<W: Write>(
    writer: &mut W,
    store: &EntryStore,
    user: &UserId,
    today: CalendarDate,
    engine: &EngineConfig,
    json: bool,
) -> Result<()> {
    let report = predict_cycle(store.entries(user), today, engine);
    let status = report.status(today);
    let next_period_start = report.prediction.dates().next_period_start;

    if json {
        let output = StatusOutput {
            user,
            next_period_start,
            status: &status,
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&output)?)?;
        return Ok(());
    }

    writeln!(writer, "CYCLE STATUS: {user} on {today}")?;
    match status.cycle_day {
        Some(day) => writeln!(writer, "Cycle day:   {day}")?,
        None => writeln!(writer, "Cycle day:   unknown (no entries)")?,
    }
    writeln!(writer, "Phase:       {}", status.phase)?;
    writeln!(
        writer,
        "Next period: {next_period_start} ({})",
        countdown(status.days_until_next_period)
    )?;
    if let Some(entry) = &status.current_entry {
        writeln!(writer, "Current period entry: {entry}")?;
    }
    Ok(())
}

fn countdown(days_until: i64) -> String {
    match days_until {
        0 => "today".to_string(),
        n if n > 0 => format!("in {}", days(n)),
        n => format!("{} late", days(-n)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    const SNAPSHOT: &str = r#"{
        "alice": [
            {"id": "a1", "startDate": "2024-01-01"},
            {"id": "a2", "startDate": "2024-01-29"},
            {"id": "a3", "startDate": "2024-02-26"}
        ]
    }"#;

    fn render(user: &str, today: &str, json: bool) -> String {
        let store = EntryStore::from_json(SNAPSHOT).unwrap();
        let mut output = Vec::new();
        run(
            &mut output,
            &store,
            &UserId::new(user).unwrap(),
            CalendarDate::parse(today).unwrap(),
            &EngineConfig::default(),
            json,
        )
        .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn status_command_during_running_period() {
        assert_snapshot!(render("alice", "2024-03-01", false), @r"
        CYCLE STATUS: alice on 2024-03-01
        Cycle day:   5
        Phase:       menstrual
        Next period: 2024-03-25 (in 24 days)
        Current period entry: a3
        ");
    }

    #[test]
    fn status_command_reports_late_period() {
        let output = render("alice", "2024-04-01", false);
        assert!(output.contains("Phase:       overdue"));
        assert!(output.contains("Next period: 2024-03-25 (7 days late)"));
        assert!(!output.contains("Current period entry"));
    }

    #[test]
    fn status_command_without_history() {
        let output = render("nobody", "2024-03-01", false);
        assert!(output.contains("Cycle day:   unknown (no entries)"));
        assert!(output.contains("Next period: 2024-03-29 (in 28 days)"));
    }

    #[test]
    fn status_command_renders_json() {
        let output = render("alice", "2024-03-10", true);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["user"], "alice");
        assert_eq!(value["today"], "2024-03-10");
        assert_eq!(value["cycleDay"], 14);
        assert_eq!(value["phase"], "fertile");
        assert_eq!(value["daysUntilNextPeriod"], 15);
        assert_eq!(value["nextPeriodStart"], "2024-03-25");
        assert!(value.get("currentEntry").is_none());
    }

    #[test]
    fn countdown_wording() {
        assert_eq!(countdown(0), "today");
        assert_eq!(countdown(1), "in 1 day");
        assert_eq!(countdown(-3), "3 days late");
    }
}
