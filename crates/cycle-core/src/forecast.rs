//! Next-cycle projection.
//!
//! Ovulation is placed a fixed [`LUTEAL_PHASE_DAYS`] before the projected
//! period; the luteal phase is not calibrated per user.

use serde::{Deserialize, Serialize};

use crate::confidence::ConfidenceTier;
use crate::date::CalendarDate;
use crate::stats::CycleStatistics;

/// Days from ovulation to the next period.
pub const LUTEAL_PHASE_DAYS: i64 = 14;
/// Fertile days before ovulation.
pub const FERTILE_DAYS_BEFORE_OVULATION: i64 = 5;
/// Fertile days after ovulation.
pub const FERTILE_DAYS_AFTER_OVULATION: i64 = 1;

/// What the projection is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Start date of the most recent logged entry.
    LastPeriodStart(CalendarDate),
    /// Caller-supplied date used when there is no history at all.
    Fallback(CalendarDate),
}

impl Anchor {
    pub const fn date(self) -> CalendarDate {
        match self {
            Self::LastPeriodStart(date) | Self::Fallback(date) => date,
        }
    }
}

/// The projected next cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CyclePrediction {
    pub next_period_start: CalendarDate,
    pub next_period_end: CalendarDate,
    pub ovulation_date: CalendarDate,
    pub fertile_window_start: CalendarDate,
    pub fertile_window_end: CalendarDate,
    /// The whole-day step between the anchor and `next_period_start`.
    pub cycle_length_days: i64,
    pub anchor_date: CalendarDate,
    pub confidence: ConfidenceTier,
}

impl CyclePrediction {
    /// Projects the next cycle from `anchor` using the averages in `stats`.
    ///
    /// A [`Anchor::Fallback`] always yields [`ConfidenceTier::Low`].
    pub fn project(anchor: Anchor, stats: &CycleStatistics) -> Self {
        let cycle_length_days = whole_days(stats.average_cycle_length_days).max(1);
        let period_length_days = whole_days(stats.average_period_length_days).max(1);

        let anchor_date = anchor.date();
        let next_period_start = anchor_date.add_days(cycle_length_days);
        let next_period_end = next_period_start.add_days(period_length_days - 1);
        let ovulation_date = next_period_start.add_days(-LUTEAL_PHASE_DAYS);

        let confidence = match anchor {
            Anchor::LastPeriodStart(_) => stats.confidence,
            Anchor::Fallback(_) => ConfidenceTier::Low,
        };

        Self {
            next_period_start,
            next_period_end,
            ovulation_date,
            fertile_window_start: ovulation_date.add_days(-FERTILE_DAYS_BEFORE_OVULATION),
            fertile_window_end: ovulation_date.add_days(FERTILE_DAYS_AFTER_OVULATION),
            cycle_length_days,
            anchor_date,
            confidence,
        }
    }
}

/// Rounds half away from zero to a whole number of days.
#[expect(
    clippy::cast_possible_truncation,
    reason = "the cast saturates and date arithmetic saturates with it"
)]
fn whole_days(value: f64) -> i64 {
    value.round() as i64
}
