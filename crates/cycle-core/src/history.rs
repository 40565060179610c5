//! Cycle history normalization.
//!
//! Turns the unordered entry collection into an ascending sequence where each
//! record knows the length of the cycle it opens. Cycle lengths are only ever
//! measured between neighbours in sorted order.

use serde::Serialize;

use crate::entry::{CycleEntry, RawCycleEntry};

/// A validated entry with its derived lengths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub entry: CycleEntry,
    /// Days until the next entry's start; `None` for the most recent entry.
    pub cycle_length_days: Option<i64>,
    /// Inclusive flow days; `None` without an end date.
    pub period_length_days: Option<i64>,
}

/// Entries sorted ascending by start date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CycleHistory {
    records: Vec<HistoryRecord>,
}

impl CycleHistory {
    /// Validates, sorts and annotates raw entries.
    ///
    /// Entries without a usable start date are skipped. Entries sharing
    /// a start date keep their input order.
    pub fn from_raw(raw: &[RawCycleEntry]) -> Self {
        let mut entries = Vec::with_capacity(raw.len());
        for (index, item) in raw.iter().enumerate() {
            match item.validate(index) {
                Ok(entry) => entries.push(entry),
                Err(reason) => {
                    tracing::warn!(index, id = %item.id, ?reason, "excluding cycle entry");
                }
            }
        }
        Self::from_entries(entries)
    }

    /// Sorts and annotates already validated entries.
    pub fn from_entries(mut entries: Vec<CycleEntry>) -> Self {
        // `sort_by_key` is stable, which is the tie-break for equal start dates.
        entries.sort_by_key(|entry| entry.start_date);

        let next_starts: Vec<_> = entries
            .iter()
            .skip(1)
            .map(|entry| Some(entry.start_date))
            .chain(std::iter::once(None))
            .collect();

        let records = entries
            .into_iter()
            .zip(next_starts)
            .map(|(entry, next_start)| HistoryRecord {
                cycle_length_days: next_start.map(|next| next.days_since(entry.start_date)),
                period_length_days: entry.period_length_days(),
                entry,
            })
            .collect();

        Self { records }
    }

    /// All records, oldest first.
    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The entry with the latest start date.
    pub fn most_recent(&self) -> Option<&CycleEntry> {
        self.records.last().map(|record| &record.entry)
    }

    /// Every complete cycle length, oldest first.
    pub fn cycle_lengths(&self) -> Vec<i64> {
        self.records
            .iter()
            .filter_map(|record| record.cycle_length_days)
            .collect()
    }

    /// Every known period length, oldest first.
    pub fn period_lengths(&self) -> Vec<i64> {
        self.records
            .iter()
            .filter_map(|record| record.period_length_days)
            .collect()
    }

    /// The `count` most recent entries, oldest first.
    pub fn recent_entries(&self, count: usize) -> impl Iterator<Item = &CycleEntry> {
        let skip = self.records.len().saturating_sub(count);
        self.records.iter().skip(skip).map(|record| &record.entry)
    }
}
