//! Cycle statistics.
//!
//! # Conventions
//!
//! - Averages are plain arithmetic means and are reported unrounded.
//! - Variability is the population standard deviation of the cycle lengths
//!   (divided by the number of observations), rounded half away from zero to
//!   one decimal.
//! - Without observations the configured defaults are used.

use serde::{Deserialize, Serialize};

use crate::confidence::ConfidenceTier;
use crate::history::CycleHistory;

/// Fallback figures used when the history cannot supply them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Cycle length assumed without any complete cycle.
    /// Default: 28.
    pub default_cycle_length_days: f64,

    /// Period length assumed when no entry has an end date.
    /// Default: 5.
    pub default_period_length_days: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_cycle_length_days: 28.0,
            default_period_length_days: 5.0,
        }
    }
}

/// Descriptive statistics over a user's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleStatistics {
    pub average_cycle_length_days: f64,
    pub average_period_length_days: f64,
    pub cycle_variability_days: f64,
    /// Number of complete cycle-length observations.
    pub sample_size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortest_cycle_days: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longest_cycle_days: Option<i64>,
    pub confidence: ConfidenceTier,
}

impl CycleStatistics {
    /// Reduces a normalized history to statistics.
    pub fn compute(history: &CycleHistory, config: &EngineConfig) -> Self {
        let cycle_lengths = history.cycle_lengths();
        let period_lengths = history.period_lengths();
        let sample_size = cycle_lengths.len();

        let average_cycle_length_days = mean(&cycle_lengths)
            .filter(|avg| *avg > 0.0)
            .unwrap_or(config.default_cycle_length_days);
        let average_period_length_days = mean(&period_lengths)
            .filter(|avg| *avg > 0.0)
            .unwrap_or(config.default_period_length_days);
        let cycle_variability_days = round_one_decimal(population_std_dev(&cycle_lengths));

        let stats = Self {
            average_cycle_length_days,
            average_period_length_days,
            cycle_variability_days,
            sample_size,
            shortest_cycle_days: cycle_lengths.iter().copied().min(),
            longest_cycle_days: cycle_lengths.iter().copied().max(),
            confidence: ConfidenceTier::classify(sample_size, cycle_variability_days),
        };

        tracing::debug!(
            entries = history.len(),
            sample_size,
            avg_cycle = stats.average_cycle_length_days,
            avg_period = stats.average_period_length_days,
            variability = stats.cycle_variability_days,
            confidence = %stats.confidence,
            "computed cycle statistics"
        );

        stats
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "day counts are far below 2^52"
)]
fn mean(values: &[i64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<i64>() as f64 / values.len() as f64)
}

#[expect(
    clippy::cast_precision_loss,
    reason = "day counts are far below 2^52"
)]
fn population_std_dev(values: &[i64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let Some(avg) = mean(values) else {
        return 0.0;
    };
    let variance = values
        .iter()
        .map(|&v| (v as f64 - avg).powi(2))
        .sum::<f64>()
        / values.len() as f64;
    variance.sqrt()
}

/// Rounds half away from zero to one decimal place.
pub(crate) fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
