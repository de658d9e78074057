use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use takt_core::Period;
use takt_store::RecordStore;
use tracing_subscriber::EnvFilter;

use takt_cli::commands::{cat, check, commit, edit, summary, util};
use takt_cli::{Cli, Commands, Config};

/// Load config and open the record store, creating the log if it is missing.
fn open_store(config_path: Option<&Path>) -> Result<(RecordStore, Config)> {
    let config = load_config(config_path)?;
    let store = RecordStore::open(&config.file)
        .with_context(|| format!("failed to open {}", config.file.display()))?;
    Ok((store, config))
}

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
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
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let mut stdout = io::stdout().lock();
    match &cli.command {
        Some(Commands::Check { notes, at }) => {
            let (store, _config) = open_store(cli.config.as_deref())?;
            let at = match at {
                Some(at) => util::parse_datetime(at)?,
                None => Local::now().fixed_offset(),
            };
            check::run(&mut stdout, &store, notes.as_deref().unwrap_or_default(), at)?;
        }
        Some(Commands::Cat { head }) => {
            let (store, _config) = open_store(cli.config.as_deref())?;
            cat::run(&mut stdout, &store, *head)?;
        }
        Some(Commands::Day(args)) => {
            let (store, _config) = open_store(cli.config.as_deref())?;
            summary::run(&mut stdout, &store, Period::Day, *args)?;
        }
        Some(Commands::Week(args)) => {
            let (store, _config) = open_store(cli.config.as_deref())?;
            summary::run(&mut stdout, &store, Period::Week, *args)?;
        }
        Some(Commands::Month(args)) => {
            let (store, _config) = open_store(cli.config.as_deref())?;
            summary::run(&mut stdout, &store, Period::Month, *args)?;
        }
        Some(Commands::Year(args)) => {
            let (store, _config) = open_store(cli.config.as_deref())?;
            summary::run(&mut stdout, &store, Period::Year, *args)?;
        }
        Some(Commands::Summary { by, args }) => {
            let (store, _config) = open_store(cli.config.as_deref())?;
            summary::run(&mut stdout, &store, *by, *args)?;
        }
        Some(Commands::Edit) => {
            let (_store, config) = open_store(cli.config.as_deref())?;
            edit::run(&config)?;
        }
        Some(Commands::Commit { message }) => {
            let config = load_config(cli.config.as_deref())?;
            commit::run(&mut stdout, &config, message.as_deref())?;
        }
        Some(Commands::Version) => {
            println!("Version: {}", env!("CARGO_PKG_VERSION"));
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
