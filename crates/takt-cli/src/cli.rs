//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use takt_core::Period;

/// CLI time tracking tool.
///
/// Check in and out to a plain CSV log, then summarize the time worked by
/// day, week, month or year.
#[derive(Debug, Parser)]
#[command(name = "takt", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check in or out, whichever closes the current state.
    #[command(visible_alias = "c")]
    Check {
        /// Note saved with the record.
        notes: Option<String>,

        /// Record at this time instead of now (ISO 8601 or e.g. '15 minutes ago').
        #[arg(long)]
        at: Option<String>,
    },

    /// Show records, newest first.
    #[command(visible_alias = "display")]
    Cat {
        /// Only show the first HEAD records.
        head: Option<usize>,
    },

    /// Daily summary.
    #[command(visible_alias = "d")]
    Day(SummaryArgs),

    /// Week to date summary (ISO weeks).
    #[command(visible_alias = "w")]
    Week(SummaryArgs),

    /// Month to date summary.
    #[command(visible_alias = "m")]
    Month(SummaryArgs),

    /// Year to date summary.
    #[command(visible_alias = "y")]
    Year(SummaryArgs),

    /// Summary for any period (day, week, month, year).
    #[command(visible_alias = "s")]
    Summary {
        /// Period to group by.
        #[arg(long, default_value = "day")]
        by: Period,

        #[command(flatten)]
        args: SummaryArgs,
    },

    /// Open the records file in an editor.
    #[command(visible_alias = "e")]
    Edit,

    /// Commit the records file to its enclosing git repository.
    #[command(visible_aliases = ["cm", "sync"])]
    Commit {
        /// Commit message.
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Print the version number of takt.
    Version,
}

/// Options shared by the summary commands.
#[derive(Debug, Clone, Copy, Args)]
pub struct SummaryArgs {
    /// Only show the HEAD most recent periods.
    pub head: Option<usize>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}
