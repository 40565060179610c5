//! The prediction facade.
//!
//! [`predict_cycle`] is the single entry point: raw entries and an evaluation
//! date in, statistics and a projection out. It never fails; missing history
//! lowers confidence and falls back to the configured defaults.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use rayon::prelude::*;
use serde::Serialize;

use crate::date::CalendarDate;
use crate::enhance::{AiSuggestion, Prediction};
use crate::entry::RawCycleEntry;
use crate::forecast::{Anchor, CyclePrediction};
use crate::history::CycleHistory;
use crate::stats::{CycleStatistics, EngineConfig};
use crate::status::CycleStatus;
use crate::types::UserId;

/// Statistics and projection for one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleReport {
    pub statistics: CycleStatistics,
    pub prediction: Prediction,
    #[serde(skip)]
    history: CycleHistory,
}

/// Computes statistics and the next-cycle projection.
///
/// `today` anchors the projection only when no entry is usable.
pub fn predict_cycle(
    entries: &[RawCycleEntry],
    today: CalendarDate,
    config: &EngineConfig,
) -> CycleReport {
    let history = CycleHistory::from_raw(entries);
    let statistics = CycleStatistics::compute(&history, config);

    let anchor = history.most_recent().map_or_else(
        || {
            tracing::debug!(%today, "no usable entries, anchoring projection on evaluation date");
            Anchor::Fallback(today)
        },
        |entry| Anchor::LastPeriodStart(entry.start_date),
    );
    let prediction = CyclePrediction::project(anchor, &statistics);

    CycleReport {
        statistics,
        prediction: prediction.into(),
        history,
    }
}

/// Runs [`predict_cycle`] for every user of an entry store snapshot.
///
/// Users are independent, so they are evaluated in parallel.
pub fn predict_all<S: std::hash::BuildHasher + Sync>(
    store: &HashMap<UserId, Vec<RawCycleEntry>, S>,
    today: CalendarDate,
    config: &EngineConfig,
) -> BTreeMap<UserId, CycleReport> {
    store
        .par_iter()
        .map(|(user, entries)| (user.clone(), predict_cycle(entries, today, config)))
        .collect::<Vec<_>>()
        .into_iter()
        .collect()
}

impl CycleReport {
    /// The normalized history the report was built from.
    pub const fn history(&self) -> &CycleHistory {
        &self.history
    }

    /// Where `today` falls in the cycle.
    pub fn status(&self, today: CalendarDate) -> CycleStatus {
        CycleStatus::evaluate(&self.history, self.prediction.dates(), today)
    }

    /// Applies the outcome of an AI enhancement call.
    ///
    /// An error, or a suggestion that fails validation, leaves the
    /// deterministic prediction untouched.
    #[must_use]
    pub fn enhance<E: fmt::Display>(mut self, outcome: Result<AiSuggestion, E>) -> Self {
        let base = match &self.prediction {
            Prediction::Deterministic(prediction) => prediction,
            Prediction::AiEnhanced(_) => {
                tracing::debug!("prediction already enhanced, ignoring second suggestion");
                return self;
            }
        };

        let suggestion = match outcome {
            Ok(suggestion) => suggestion,
            Err(err) => {
                tracing::warn!(error = %err, "AI enhancement failed, using deterministic prediction");
                return self;
            }
        };

        match suggestion.validate(base.anchor_date) {
            Ok(validated) => {
                tracing::debug!(
                    next_period_start = %validated.next_period_start,
                    "accepted AI suggestion"
                );
                self.prediction = Prediction::enhanced(base, validated);
            }
            Err(err) => {
                tracing::warn!(error = %err, "rejected AI suggestion, using deterministic prediction");
            }
        }
        self
    }
}
