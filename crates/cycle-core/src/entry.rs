//! Cycle entries as logged by the user.
//!
//! [`RawCycleEntry`] mirrors what the entry store hands over and is lenient on
//! purpose: dates stay strings so a single bad record cannot fail decoding of
//! a whole collection. [`CycleEntry`] is the validated form the engine works on.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::date::CalendarDate;
use crate::types::{EntryId, FlowLevel};

/// A cycle entry exactly as supplied by the entry store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCycleEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default, alias = "start_date")]
    pub start_date: Option<String>,
    #[serde(default, alias = "end_date")]
    pub end_date: Option<String>,
    #[serde(default, alias = "flow_level", alias = "flow")]
    pub flow_level: Option<String>,
    #[serde(default)]
    pub symptoms: Vec<String>,
}

/// One validated menstrual period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleEntry {
    pub id: EntryId,
    pub start_date: CalendarDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<CalendarDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_level: Option<FlowLevel>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub symptoms: BTreeSet<String>,
}

impl CycleEntry {
    /// Inclusive number of days of flow, when the end date is known.
    pub fn period_length_days(&self) -> Option<i64> {
        self.end_date
            .map(|end| end.days_since(self.start_date) + 1)
    }
}

/// Why a raw entry could not be turned into a [`CycleEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The start date is absent or unparsable.
    InvalidStartDate,
}

impl RawCycleEntry {
    /// Validates the entry found at `index` in its collection.
    ///
    /// Only the start date is required. A blank id is replaced by
    /// `entry-<index>`. A malformed end date, or one before the start date,
    /// is dropped and logged; an unknown flow label is dropped silently.
    pub fn validate(&self, index: usize) -> Result<CycleEntry, Rejection> {
        let start_date = self
            .start_date
            .as_deref()
            .and_then(|s| CalendarDate::parse(s).ok())
            .ok_or(Rejection::InvalidStartDate)?;

        let id = EntryId::new(self.id.as_str()).unwrap_or_else(|_| EntryId::positional(index));

        let end_date = match self.end_date.as_deref().filter(|s| !s.trim().is_empty()) {
            None => None,
            Some(raw) => match CalendarDate::parse(raw) {
                Ok(end) if end >= start_date => Some(end),
                Ok(end) => {
                    tracing::warn!(
                        entry_id = %id,
                        start = %start_date,
                        end = %end,
                        "end date precedes start date, ignoring end date"
                    );
                    None
                }
                Err(err) => {
                    tracing::warn!(entry_id = %id, error = %err, "ignoring unparsable end date");
                    None
                }
            },
        };

        let flow_level = self.flow_level.as_deref().and_then(|s| s.parse().ok());

        let symptoms = self
            .symptoms
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Ok(CycleEntry {
            id,
            start_date,
            end_date,
            flow_level,
            symptoms,
        })
    }
}
