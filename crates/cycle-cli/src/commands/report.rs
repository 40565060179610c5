//! Report command for predicting every user in the entry store.

use std::collections::BTreeMap;
use std::io::Write;

use anyhow::Result;
use cycle_core::{CalendarDate, CycleReport, EngineConfig, UserId, predict_all};

use crate::store::EntryStore;

pub fn run<W: Write>(
    writer: &mut W,
    store: &EntryStore,
    today: CalendarDate,
    engine: &EngineConfig,
    json: bool,
) -> Result<()> {
    let reports = predict_all(store.users(), today, engine);
    tracing::debug!(users = reports.len(), "computed predictions");

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&reports)?)?;
        return Ok(());
    }

    write!(writer, "{}", format_report(today, &reports))?;
    Ok(())
}

fn format_report(today: CalendarDate, reports: &BTreeMap<UserId, CycleReport>) -> String {
    use std::fmt::Write as _;

    let mut output = String::new();
    writeln!(output, "CYCLE REPORT: {today}").unwrap();

    if reports.is_empty() {
        writeln!(output, "No users in entry store.").unwrap();
        return output;
    }

    let width = reports
        .keys()
        .map(|user| user.as_str().len())
        .max()
        .unwrap_or(0)
        .max("USER".len());

    writeln!(
        output,
        "{:<width$}  {:<11}  {:<10}  {:<10}  CYCLES",
        "USER", "NEXT PERIOD", "OVULATION", "CONFIDENCE"
    )
    .unwrap();
    for (user, report) in reports {
        let dates = report.prediction.dates();
        writeln!(
            output,
            "{:<width$}  {:<11}  {:<10}  {:<10}  {}",
            user.as_str(),
            dates.next_period_start.to_string(),
            dates.ovulation_date.to_string(),
            dates.confidence.as_str(),
            report.statistics.sample_size,
        )
        .unwrap();
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    const SNAPSHOT: &str = r#"{
        "bob": [],
        "alice": [
            {"id": "a1", "startDate": "2024-01-01"},
            {"id": "a2", "startDate": "2024-01-29"},
            {"id": "a3", "startDate": "2024-02-26"}
        ],
        "charlotte": [
            {"id": "c1", "startDate": "2024-02-10", "endDate": "2024-02-14"}
        ]
    }"#;

    fn render(snapshot: &str, json: bool) -> String {
        let store = EntryStore::from_json(snapshot).unwrap();
        let mut output = Vec::new();
        run(
            &mut output,
            &store,
            CalendarDate::parse("2024-03-01").unwrap(),
            &EngineConfig::default(),
            json,
        )
        .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn report_command_lists_users_in_order() {
        assert_snapshot!(render(SNAPSHOT, false), @r"
        CYCLE REPORT: 2024-03-01
        USER       NEXT PERIOD  OVULATION   CONFIDENCE  CYCLES
        alice      2024-03-25   2024-03-11  medium      2
        bob        2024-03-29   2024-03-15  low         0
        charlotte  2024-03-09   2024-02-24  low         0
        ");
    }

    #[test]
    fn report_command_with_empty_store() {
        assert_snapshot!(render("{}", false), @r"
        CYCLE REPORT: 2024-03-01
        No users in entry store.
        ");
    }

    #[test]
    fn report_command_renders_json_keyed_by_user() {
        let output = render(SNAPSHOT, true);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["alice"]["prediction"]["nextPeriodStart"], "2024-03-25");
        assert_eq!(value["bob"]["statistics"]["sampleSize"], 0);
        assert_eq!(value["charlotte"]["statistics"]["averagePeriodLengthDays"], 5.0);
        assert!(value["alice"].get("history").is_none());
    }
}
