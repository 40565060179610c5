//! Stats command for showing a user's cycle statistics.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use cycle_core::{CalendarDate, CycleStatistics, EngineConfig, UserId, predict_cycle};
use serde::Serialize;

use crate::commands::util::days;
use crate::store::EntryStore;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsOutput<'a> {
    user: &'a UserId,
    statistics: &'a CycleStatistics,
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

    if json {
        let output = StatsOutput {
            user,
            statistics: &report.statistics,
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&output)?)?;
    } else {
        write!(writer, "{}", format_stats(user, &report.statistics))?;
    }
    Ok(())
}

/// Human-readable statistics block.
pub fn format_stats(user: &UserId, stats: &CycleStatistics) -> String {
    let mut output = String::new();
    writeln!(output, "CYCLE STATISTICS: {user}").unwrap();
    writeln!(
        output,
        "Average cycle:   {:.1} days",
        stats.average_cycle_length_days
    )
    .unwrap();
    writeln!(
        output,
        "Average period:  {:.1} days",
        stats.average_period_length_days
    )
    .unwrap();
    writeln!(
        output,
        "Variability:     {:.1} days",
        stats.cycle_variability_days
    )
    .unwrap();
    writeln!(output, "Cycles measured: {}", stats.sample_size).unwrap();
    if let (Some(shortest), Some(longest)) = (stats.shortest_cycle_days, stats.longest_cycle_days) {
        writeln!(output, "Shortest cycle:  {}", days(shortest)).unwrap();
        writeln!(output, "Longest cycle:   {}", days(longest)).unwrap();
    }
    writeln!(output, "Confidence:      {}", stats.confidence).unwrap();
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    const SNAPSHOT: &str = r#"{
        "alice": [
            {"id": "a3", "startDate": "2024-03-25"},
            {"id": "a1", "startDate": "2024-01-01", "endDate": "2024-01-06"},
            {"id": "a2", "startDate": "2024-01-26", "endDate": "2024-01-29"},
            {"id": "a0", "startDate": "2024-02-26"}
        ]
    }"#;

    fn render(user: &str, json: bool) -> String {
        let store = EntryStore::from_json(SNAPSHOT).unwrap();
        let mut output = Vec::new();
        run(
            &mut output,
            &store,
            &UserId::new(user).unwrap(),
            CalendarDate::parse("2024-04-01").unwrap(),
            &EngineConfig::default(),
            json,
        )
        .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn stats_command_renders_text() {
        assert_snapshot!(render("alice", false), @r"
        CYCLE STATISTICS: alice
        Average cycle:   28.0 days
        Average period:  5.0 days
        Variability:     2.4 days
        Cycles measured: 3
        Shortest cycle:  25 days
        Longest cycle:   31 days
        Confidence:      high
        ");
    }

    #[test]
    fn stats_command_without_history_shows_defaults() {
        let output = render("nobody", false);
        assert!(output.contains("Average cycle:   28.0 days"));
        assert!(output.contains("Cycles measured: 0"));
        assert!(!output.contains("Shortest cycle"));
        assert!(output.contains("Confidence:      low"));
    }

    #[test]
    fn stats_command_renders_json() {
        let output = render("alice", true);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["user"], "alice");
        assert_eq!(value["statistics"]["sampleSize"], 3);
        assert_eq!(value["statistics"]["cycleVariabilityDays"], 2.4);
        assert_eq!(value["statistics"]["confidence"], "high");
    }
}
