//! Takt CLI library.
//!
//! Command-line interface over the takt event log: checking in and out,
//! listing records and summarizing time worked per period.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, SummaryArgs};
pub use config::Config;
