//! CLI subcommand implementations.

pub mod history;
pub mod predict;
pub mod report;
pub mod stats;
pub mod status;
pub mod util;
