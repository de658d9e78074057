//! Core domain logic for takt.
//!
//! This crate contains the fundamental types and logic for:
//! - Events: the `in`/`out` entries of the log
//! - Session pairing: reconstructing worked intervals from a lenient log
//! - Aggregation: bucketing sessions by day, ISO week, month or year
//! - Formatting: compact rendering of fractional hours

mod aggregate;
pub mod event;
mod format;
pub mod period;
pub mod session;

pub use aggregate::{AggregateError, AggregatedBucket, aggregate, aggregate_at};
pub use event::{Event, EventKind, INFERRED_NOTE, UnknownEventKind};
pub use format::format_hours;
pub use period::Period;
pub use session::{Session, infer_closing_event, pair_sessions};
