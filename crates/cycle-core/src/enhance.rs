//! Optional AI enhancement of a deterministic prediction.
//!
//! The generative service is untrusted: its answer only replaces the
//! projected dates after every field parses and the dates are in a sane
//! order. Confidence is never taken from the service.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::date::{CalendarDate, DateParseError};
use crate::forecast::CyclePrediction;

/// Why a suggestion from the AI service was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnhancementError {
    /// A required date field did not parse.
    #[error("{field}: {source}")]
    InvalidDate {
        field: &'static str,
        #[source]
        source: DateParseError,
    },

    /// Dates parsed but do not describe a coherent cycle.
    #[error("inconsistent dates: {reason}")]
    Inconsistent { reason: &'static str },

    /// The free-text analysis was empty.
    #[error("analysis cannot be empty")]
    EmptyAnalysis,
}

/// The JSON object the AI service is asked to return.
///
/// Dates stay strings until [`AiSuggestion::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSuggestion {
    pub next_period_start: String,
    pub next_period_end: String,
    pub ovulation_date: String,
    pub fertile_window_start: String,
    pub fertile_window_end: String,
    pub analysis: String,
    #[serde(default)]
    pub health_tips: Vec<String>,
}

/// A suggestion whose dates have been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSuggestion {
    pub next_period_start: CalendarDate,
    pub next_period_end: CalendarDate,
    pub ovulation_date: CalendarDate,
    pub fertile_window_start: CalendarDate,
    pub fertile_window_end: CalendarDate,
    pub analysis: String,
    pub health_tips: Vec<String>,
}

fn parse_field(field: &'static str, value: &str) -> Result<CalendarDate, EnhancementError> {
    CalendarDate::parse(value).map_err(|source| EnhancementError::InvalidDate { field, source })
}

impl AiSuggestion {
    /// Checks the suggestion against the anchor the engine projected from.
    pub fn validate(&self, anchor: CalendarDate) -> Result<ValidatedSuggestion, EnhancementError> {
        let next_period_start = parse_field("nextPeriodStart", &self.next_period_start)?;
        let next_period_end = parse_field("nextPeriodEnd", &self.next_period_end)?;
        let ovulation_date = parse_field("ovulationDate", &self.ovulation_date)?;
        let fertile_window_start = parse_field("fertileWindowStart", &self.fertile_window_start)?;
        let fertile_window_end = parse_field("fertileWindowEnd", &self.fertile_window_end)?;

        if next_period_start <= anchor {
            return Err(EnhancementError::Inconsistent {
                reason: "next period must start after the last period",
            });
        }
        if next_period_end < next_period_start {
            return Err(EnhancementError::Inconsistent {
                reason: "next period ends before it starts",
            });
        }
        if !(fertile_window_start <= ovulation_date && ovulation_date <= fertile_window_end) {
            return Err(EnhancementError::Inconsistent {
                reason: "ovulation must fall inside the fertile window",
            });
        }
        if fertile_window_end >= next_period_start {
            return Err(EnhancementError::Inconsistent {
                reason: "fertile window must end before the next period",
            });
        }

        let analysis = self.analysis.trim();
        if analysis.is_empty() {
            return Err(EnhancementError::EmptyAnalysis);
        }

        let health_tips = self
            .health_tips
            .iter()
            .map(|tip| tip.trim())
            .filter(|tip| !tip.is_empty())
            .map(str::to_string)
            .collect();

        Ok(ValidatedSuggestion {
            next_period_start,
            next_period_end,
            ovulation_date,
            fertile_window_start,
            fertile_window_end,
            analysis: analysis.to_string(),
            health_tips,
        })
    }
}

/// A prediction, tagged by where its dates came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "camelCase")]
pub enum Prediction {
    /// Computed by the engine alone.
    Deterministic(CyclePrediction),
    /// Dates accepted from the AI service, plus its commentary.
    AiEnhanced(EnhancedPrediction),
}

/// Dates from a validated AI suggestion with the accompanying text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedPrediction {
    #[serde(flatten)]
    pub prediction: CyclePrediction,
    pub analysis: String,
    pub health_tips: Vec<String>,
}

impl Prediction {
    /// The dates and confidence, whichever variant this is.
    pub const fn dates(&self) -> &CyclePrediction {
        match self {
            Self::Deterministic(prediction)
            | Self::AiEnhanced(EnhancedPrediction { prediction, .. }) => prediction,
        }
    }

    pub const fn is_enhanced(&self) -> bool {
        matches!(self, Self::AiEnhanced(_))
    }

    /// Merges a validated suggestion over `base`.
    ///
    /// Derived fields are recomputed from the accepted dates; confidence and
    /// anchor stay the engine's.
    pub fn enhanced(base: &CyclePrediction, suggestion: ValidatedSuggestion) -> Self {
        let prediction = CyclePrediction {
            next_period_start: suggestion.next_period_start,
            next_period_end: suggestion.next_period_end,
            ovulation_date: suggestion.ovulation_date,
            fertile_window_start: suggestion.fertile_window_start,
            fertile_window_end: suggestion.fertile_window_end,
            cycle_length_days: suggestion.next_period_start.days_since(base.anchor_date),
            anchor_date: base.anchor_date,
            confidence: base.confidence,
        };
        Self::AiEnhanced(EnhancedPrediction {
            prediction,
            analysis: suggestion.analysis,
            health_tips: suggestion.health_tips,
        })
    }
}

impl From<CyclePrediction> for Prediction {
    fn from(prediction: CyclePrediction) -> Self {
        Self::Deterministic(prediction)
    }
}
