//! Cat command for listing raw records.

use std::io::Write;

use anyhow::{Context, Result};
use takt_core::Event;
use takt_store::{HEADER, RecordStore, format_timestamp};

pub fn run<W: Write>(writer: &mut W, store: &RecordStore, head: Option<usize>) -> Result<()> {
    let events = match head {
        Some(n) => store.head(n),
        None => store.load(),
    }
    .with_context(|| format!("failed to read {}", store.path().display()))?;

    write_records(writer, &events)
}

fn write_records<W: Write>(writer: &mut W, events: &[Event]) -> Result<()> {
    let [timestamp, kind, notes] = HEADER;
    writeln!(writer, "{timestamp:<25} {kind:<5} {notes}")?;
    for event in events {
        let line = format!(
            "{:<25} {:<5} {}",
            format_timestamp(&event.timestamp),
            event.kind.as_str(),
            event.notes
        );
        writeln!(writer, "{}", line.trim_end())?;
    }
    Ok(())
}
