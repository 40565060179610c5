//! Cycle statistics and prediction engine.
//!
//! This crate contains the deterministic core of cycle tracking:
//! - History: validating, sorting and measuring logged entries
//! - Statistics: averages, variability and a confidence tier
//! - Forecast: next period, ovulation day and fertile window
//! - Enhancement: merging a validated AI suggestion over the forecast
//!
//! Everything here is pure and synchronous; I/O belongs to the callers.

mod confidence;
pub mod date;
mod engine;
mod enhance;
mod entry;
mod forecast;
mod history;
mod stats;
mod status;
pub mod types;

pub use confidence::ConfidenceTier;
pub use date::{CalendarDate, DateParseError};
pub use engine::{CycleReport, predict_all, predict_cycle};
pub use enhance::{
    AiSuggestion, EnhancedPrediction, EnhancementError, Prediction, ValidatedSuggestion,
};
pub use entry::{CycleEntry, RawCycleEntry, Rejection};
pub use forecast::{
    Anchor, CyclePrediction, FERTILE_DAYS_AFTER_OVULATION, FERTILE_DAYS_BEFORE_OVULATION,
    LUTEAL_PHASE_DAYS,
};
pub use history::{CycleHistory, HistoryRecord};
pub use stats::{CycleStatistics, EngineConfig};
pub use status::{CURRENT_PERIOD_MAX_AGE_DAYS, CyclePhase, CycleStatus};
pub use types::{EntryId, FlowLevel, UserId, ValidationError};
