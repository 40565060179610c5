//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Cycle statistics and next-period prediction.
///
/// Reads a snapshot of logged cycle entries (a JSON object mapping user IDs
/// to entry lists) and reports statistics, projections and current status.
#[derive(Debug, Parser)]
#[command(name = "cycle", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the entry store snapshot (overrides config).
    #[arg(short, long, global = true)]
    pub entries: Option<PathBuf>,

    /// Evaluation date as YYYY-MM-DD (defaults to the local date).
    #[arg(long, global = true)]
    pub today: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show cycle statistics for a user.
    Stats(UserArgs),

    /// Predict the next period, ovulation day and fertile window.
    Predict {
        #[command(flatten)]
        user: UserArgs,

        /// Ask the configured AI service for analysis and health tips.
        #[arg(long)]
        enhance: bool,
    },

    /// Show where the user currently is in their cycle.
    Status(UserArgs),

    /// List the normalized entry history.
    History(UserArgs),

    /// Predict the next period for every user in the store.
    Report {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Arguments shared by per-user commands.
#[derive(Debug, Clone, Args)]
pub struct UserArgs {
    /// User ID in the entry store.
    #[arg(short, long)]
    pub user: String,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}
