//! Summary commands: time worked per day, week, month or year.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Local, NaiveDate};
use serde::Serialize;
use takt_core::{AggregatedBucket, Period, aggregate_at, format_hours, pair_sessions};
use takt_store::RecordStore;

use crate::SummaryArgs;

/// JSON output for a summary.
#[derive(Debug, Serialize)]
pub struct SummaryJson<'a> {
    pub period: Period,
    /// The newest session was still open and was closed at the current time.
    pub inferred_close: bool,
    pub buckets: Vec<BucketJson<'a>>,
}

/// JSON output for one period bucket.
#[derive(Debug, Serialize)]
pub struct BucketJson<'a> {
    pub label: &'a str,
    pub total_hours: f64,
    pub total: String,
    pub days: usize,
    pub average_hours: f64,
    pub average: String,
    pub dates: &'a [NaiveDate],
    pub notes: &'a [String],
}

impl<'a> From<&'a AggregatedBucket> for BucketJson<'a> {
    fn from(bucket: &'a AggregatedBucket) -> Self {
        Self {
            label: &bucket.label,
            total_hours: bucket.total_hours,
            total: format_hours(bucket.total_hours),
            days: bucket.dates.len(),
            average_hours: bucket.average_hours,
            average: format_hours(bucket.average_hours),
            dates: &bucket.dates,
            notes: &bucket.notes,
        }
    }
}

pub fn run<W: Write>(
    writer: &mut W,
    store: &RecordStore,
    period: Period,
    args: SummaryArgs,
) -> Result<()> {
    run_at(writer, store, period, args, Local::now().fixed_offset())
}

/// Like [`run`], closing an open session at `now`.
pub fn run_at<W: Write>(
    writer: &mut W,
    store: &RecordStore,
    period: Period,
    args: SummaryArgs,
    now: DateTime<FixedOffset>,
) -> Result<()> {
    let events = store
        .load()
        .with_context(|| format!("failed to read {}", store.path().display()))?;
    let buckets = aggregate_at(&events, period, now)
        .with_context(|| format!("failed to summarize {}", store.path().display()))?;
    let buckets = select_head(&buckets, args.head);

    let inferred_close = pair_sessions(&events, now).iter().any(|session| session.inferred);
    if inferred_close && !args.json {
        eprintln!("Note: currently checked in, counting up to now.");
    }

    if args.json {
        let summary = SummaryJson {
            period,
            inferred_close,
            buckets: buckets.iter().map(BucketJson::from).collect(),
        };
        let json = serde_json::to_string_pretty(&summary).context("failed to serialize summary")?;
        writeln!(writer, "{json}")?;
    } else {
        write!(writer, "{}", render_table(buckets, period))?;
    }
    Ok(())
}

/// The first `head` buckets; all of them when `head` is absent, zero, or too large.
fn select_head(buckets: &[AggregatedBucket], head: Option<usize>) -> &[AggregatedBucket] {
    let len = buckets.len();
    let n = head.filter(|n| (1..=len).contains(n)).unwrap_or(len);
    &buckets[..n]
}

/// Renders the summary table with a `Date`, `Total`, `Days`, `Avg` header.
pub fn render_table(buckets: &[AggregatedBucket], period: Period) -> String {
    // Coarser periods accumulate more hours, so the total column is wider.
    let total_width = match period {
        Period::Day => 6,
        Period::Week | Period::Month | Period::Year => 10,
    };

    let mut out = String::new();
    push_row(&mut out, total_width, "Date", "Total", "Days", "Avg");
    for bucket in buckets {
        push_row(
            &mut out,
            total_width,
            &bucket.label,
            &format_hours(bucket.total_hours),
            &bucket.dates.len().to_string(),
            &format_hours(bucket.average_hours),
        );
    }
    out
}

fn push_row(out: &mut String, total_width: usize, label: &str, total: &str, days: &str, avg: &str) {
    out.push_str(&format!("{label:<8} {total:>total_width$}\t{days:>4}\t{avg:>6}\n"));
}
