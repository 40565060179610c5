//! Three-tier confidence classification.
//!
//! A tier only rises when there is both enough history and enough regularity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Minimum observations for [`ConfidenceTier::High`].
const HIGH_MIN_SAMPLES: usize = 3;
/// Variability must be strictly below this for [`ConfidenceTier::High`].
const HIGH_MAX_VARIABILITY: f64 = 3.0;
/// Minimum observations for [`ConfidenceTier::Medium`].
const MEDIUM_MIN_SAMPLES: usize = 2;
/// Variability must be strictly below this for [`ConfidenceTier::Medium`].
const MEDIUM_MAX_VARIABILITY: f64 = 7.0;

/// How trustworthy a projection is.
///
/// Ordered so that `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    Low,
    Medium,
    High,
}

impl ConfidenceTier {
    /// Classifies from the number of cycle-length observations and their
    /// standard deviation in days.
    ///
    /// A NaN variability is never trusted.
    pub fn classify(sample_size: usize, variability_days: f64) -> Self {
        if sample_size >= HIGH_MIN_SAMPLES && variability_days < HIGH_MAX_VARIABILITY {
            Self::High
        } else if sample_size >= MEDIUM_MIN_SAMPLES && variability_days < MEDIUM_MAX_VARIABILITY {
            Self::Medium
        } else {
            Self::Low
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
