//! Cycle CLI library.
//!
//! This crate provides the CLI interface for cycle statistics and prediction.

mod cli;
pub mod commands;
mod config;
pub mod store;

pub use cli::{Cli, Commands, UserArgs};
pub use config::Config;
pub use store::EntryStore;
