//! History command for listing a user's normalized entries.

use std::io::Write;

use anyhow::Result;
use cycle_core::{CycleHistory, RawCycleEntry, UserId};
use serde::Serialize;

use crate::store::EntryStore;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HistoryOutput<'a> {
    user: &'a UserId,
    excluded: usize,
    history: &'a CycleHistory,
}

pub fn run<W: Write>(writer: &mut W, store: &EntryStore, user: &UserId, json: bool) -> Result<()> {
    let raw = store.entries(user);
    let history = CycleHistory::from_raw(raw);
    let excluded = raw.len() - history.len();

    if json {
        let output = HistoryOutput {
            user,
            excluded,
            history: &history,
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&output)?)?;
        return Ok(());
    }

    write!(writer, "{}", format_history(user, raw, &history))?;
    Ok(())
}

fn format_history(user: &UserId, raw: &[RawCycleEntry], history: &CycleHistory) -> String {
    use std::fmt::Write as _;

    let mut output = String::new();
    writeln!(output, "HISTORY: {user}").unwrap();

    if history.is_empty() {
        writeln!(output, "No usable entries.").unwrap();
    } else {
        writeln!(
            output,
            "{:<10}  {:<10}  {:>6}  {:>5}  {:<8}  SYMPTOMS",
            "START", "END", "PERIOD", "CYCLE", "FLOW"
        )
        .unwrap();
        for record in history.records() {
            let entry = &record.entry;
            let symptoms = entry.symptoms.iter().cloned().collect::<Vec<_>>().join(", ");
            let line = format!(
                "{:<10}  {:<10}  {:>6}  {:>5}  {:<8}  {}",
                entry.start_date.to_string(),
                entry.end_date.map_or_else(|| "-".to_string(), |d| d.to_string()),
                optional(record.period_length_days),
                optional(record.cycle_length_days),
                entry.flow_level.map_or("-", |flow| flow.as_str()),
                symptoms,
            );
            writeln!(output, "{}", line.trim_end()).unwrap();
        }
    }

    let excluded = raw.len() - history.len();
    if excluded > 0 {
        writeln!(output, "Excluded {excluded} entries without a valid start date.").unwrap();
    }
    output
}

fn optional(value: Option<i64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
