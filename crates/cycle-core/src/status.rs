//! Where a user currently stands in their cycle.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::date::CalendarDate;
use crate::forecast::CyclePrediction;
use crate::history::CycleHistory;
use crate::types::EntryId;

/// An entry older than this is no longer the "current" period.
pub const CURRENT_PERIOD_MAX_AGE_DAYS: i64 = 10;

/// Coarse phase of the cycle on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CyclePhase {
    Menstrual,
    Follicular,
    Fertile,
    Luteal,
    /// The projected period window has passed without a new entry.
    Overdue,
}

impl CyclePhase {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Menstrual => "menstrual",
            Self::Follicular => "follicular",
            Self::Fertile => "fertile",
            Self::Luteal => "luteal",
            Self::Overdue => "overdue",
        }
    }
}

impl fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Position of `today` relative to the history and its projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleStatus {
    pub today: CalendarDate,
    /// 1-based day of the running cycle; absent without history.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle_day: Option<i64>,
    /// Negative when the projected period is late.
    pub days_until_next_period: i64,
    /// The entry for a period that is still running.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_entry: Option<EntryId>,
    pub phase: CyclePhase,
}

impl CycleStatus {
    /// Describes `today` against `history` and its projection.
    pub fn evaluate(
        history: &CycleHistory,
        prediction: &CyclePrediction,
        today: CalendarDate,
    ) -> Self {
        let last = history.most_recent().filter(|entry| entry.start_date <= today);

        let cycle_day = last.map(|entry| today.days_since(entry.start_date) + 1);

        let current_entry = last
            .filter(|entry| today.days_since(entry.start_date) <= CURRENT_PERIOD_MAX_AGE_DAYS)
            .filter(|entry| entry.end_date.is_none_or(|end| end >= today))
            .map(|entry| entry.id.clone());

        let days_until_next_period = prediction.next_period_start.days_since(today);

        let in_logged_period = last.is_some_and(|entry| match entry.end_date {
            Some(end) => today <= end,
            None => {
                current_entry.is_some()
                    && today < entry.start_date.add_days(period_days(prediction))
            }
        });

        let phase = if in_logged_period {
            CyclePhase::Menstrual
        } else if today > prediction.next_period_end {
            CyclePhase::Overdue
        } else if today >= prediction.next_period_start {
            CyclePhase::Menstrual
        } else if (prediction.fertile_window_start..=prediction.fertile_window_end).contains(&today)
        {
            CyclePhase::Fertile
        } else if today > prediction.fertile_window_end {
            CyclePhase::Luteal
        } else {
            CyclePhase::Follicular
        };

        Self {
            today,
            cycle_day,
            days_until_next_period,
            current_entry,
            phase,
        }
    }
}

fn period_days(prediction: &CyclePrediction) -> i64 {
    prediction.next_period_end.days_since(prediction.next_period_start) + 1
}
