use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cycle_cli::commands::{history, predict, report, stats, status, util};
use cycle_cli::{Cli, Commands, Config, EntryStore, UserArgs};

/// Load config, applying the `--entries` override.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config =
        Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(path) = &cli.entries {
        config.entries_path.clone_from(path);
    }
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Diagnostics go to stderr so stdout stays parseable with --json
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = load_config(&cli)?;
    let today = util::parse_today(cli.today.as_deref())?;
    let store = EntryStore::open(&config.entries_path)?;
    let engine = config.engine();
    let mut stdout = io::stdout().lock();

    match command {
        Commands::Stats(UserArgs { user, json }) => {
            let user = util::parse_user(user)?;
            stats::run(&mut stdout, &store, &user, today, &engine, *json)?;
        }
        Commands::Predict {
            user: UserArgs { user, json },
            enhance,
        } => {
            let user = util::parse_user(user)?;
            predict::run(&mut stdout, &store, &config, &user, today, *enhance, *json)?;
        }
        Commands::Status(UserArgs { user, json }) => {
            let user = util::parse_user(user)?;
            status::run(&mut stdout, &store, &user, today, &engine, *json)?;
        }
        Commands::History(UserArgs { user, json }) => {
            let user = util::parse_user(user)?;
            history::run(&mut stdout, &store, &user, *json)?;
        }
        Commands::Report { json } => {
            report::run(&mut stdout, &store, today, &engine, *json)?;
        }
    }

    Ok(())
}
