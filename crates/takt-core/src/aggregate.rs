//! Period aggregation of reconstructed sessions.
//!
//! # Algorithm Summary
//!
//! 1. Close an open trailing check-in at `now` (see [`crate::session`])
//! 2. Pair events into sessions, newest first
//! 3. Accumulate each session into the bucket labelled by its check-in time
//! 4. Sort labels ascending, reverse, and finalize each bucket (dedupe dates, average)

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, Local, NaiveDate};
use serde::Serialize;
use thiserror::Error;

use crate::event::Event;
use crate::period::Period;
use crate::session::pair_sessions;

/// Errors that stop an aggregation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AggregateError {
    /// There is nothing to aggregate.
    #[error("no records to process")]
    EmptyLog,

    /// The period name is not one of day, week, month or year.
    #[error("unsupported period: {value}")]
    InvalidPeriod { value: String },
}

/// Time tracked within one calendar period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedBucket {
    /// Period label, e.g. `2024-01-02`, `2024-W05`, `2024-01`, `2024`.
    pub label: String,
    pub total_hours: f64,
    /// Distinct check-in dates of contributing sessions, in first-seen order.
    pub dates: Vec<NaiveDate>,
    /// Notes of contributing sessions, in scan order (duplicates and blanks kept).
    pub notes: Vec<String>,
    /// `total_hours` spread over the distinct dates.
    pub average_hours: f64,
}

impl AggregatedBucket {
    fn new(label: String) -> Self {
        Self {
            label,
            total_hours: 0.0,
            dates: Vec::new(),
            notes: Vec::new(),
            average_hours: 0.0,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn finalize(mut self) -> Self {
        let mut seen = Vec::with_capacity(self.dates.len());
        for date in self.dates {
            if !seen.contains(&date) {
                seen.push(date);
            }
        }
        self.dates = seen;
        // Every bucket is created by a session, so there is at least one date.
        self.average_hours = self.total_hours / self.dates.len() as f64;
        self
    }
}

/// Aggregates a newest-first event log by period, closing an open session at the current time.
///
/// Repeated calls on the same log give the same buckets unless the log ends on an
/// open check-in, in which case the inferred close moves with the clock.
pub fn aggregate(events: &[Event], period: Period) -> Result<Vec<AggregatedBucket>, AggregateError> {
    aggregate_at(events, period, Local::now().fixed_offset())
}

/// Like [`aggregate`], with an explicit clock for the inferred close.
pub fn aggregate_at(
    events: &[Event],
    period: Period,
    now: DateTime<FixedOffset>,
) -> Result<Vec<AggregatedBucket>, AggregateError> {
    if events.is_empty() {
        return Err(AggregateError::EmptyLog);
    }

    let mut buckets: HashMap<String, AggregatedBucket> = HashMap::new();
    for session in pair_sessions(events, now) {
        let label = period.label(&session.check_in);
        let bucket = buckets
            .entry(label)
            .or_insert_with_key(|label| AggregatedBucket::new(label.clone()));
        bucket.total_hours += session.hours();
        bucket.dates.push(session.check_in.date_naive());
        bucket.notes.push(session.notes);
    }

    let mut labels: Vec<String> = buckets.keys().cloned().collect();
    labels.sort();
    labels.reverse();

    let out: Vec<AggregatedBucket> = labels
        .iter()
        .filter_map(|label| buckets.remove(label))
        .map(AggregatedBucket::finalize)
        .collect();

    tracing::debug!(
        events = events.len(),
        buckets = out.len(),
        %period,
        "aggregated event log"
    );
    Ok(out)
}
