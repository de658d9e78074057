//! Check command: record the next `in` or `out`.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use takt_core::{Event, EventKind};
use takt_store::{RecordStore, format_timestamp};

/// Records a check at `at`, choosing the kind from the newest record.
pub fn run<W: Write>(
    writer: &mut W,
    store: &RecordStore,
    notes: &str,
    at: DateTime<FixedOffset>,
) -> Result<Event> {
    let latest = store.latest().context("failed to read the latest record")?;
    if let Some(latest) = latest.as_ref().filter(|latest| latest.timestamp > at) {
        tracing::warn!(
            latest = %latest.timestamp,
            %at,
            "recording a check older than the newest record"
        );
    }

    let kind = EventKind::next_after(latest.map(|event| event.kind));
    let event = Event::new(at, kind, notes);
    store
        .prepend(&event)
        .with_context(|| format!("failed to write to {}", store.path().display()))?;

    writeln!(writer, "Check {kind} at {}", format_timestamp(&at))?;
    Ok(event)
}
