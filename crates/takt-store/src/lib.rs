//! Record store for the takt event log.
//!
//! The log is a headered CSV file with the columns `timestamp,kind,notes`.
//! New records are written directly below the header, so the file reads
//! newest-first, but the file is meant to be edited by hand and nothing relies
//! on its order: [`RecordStore::load`] sorts by timestamp before returning.
//!
//! # Timestamp Format
//!
//! Timestamps are written as RFC 3339 with second precision and the local
//! offset (e.g. `2024-01-15T10:30:00+01:00`). Reading also accepts naive
//! `YYYY-MM-DD HH:MM:SS[.f]` values, interpreted in the local offset.
//!
//! # Concurrency
//!
//! A store assumes it is the only writer for the duration of a command.
//! Prepending goes through a temporary sibling file and a rename, so an
//! interrupted write leaves the previous log intact.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, SecondsFormat, TimeZone};
use csv::StringRecord;
use serde::Deserialize;
use takt_core::{Event, EventKind, UnknownEventKind};
use thiserror::Error;

/// Column names, in on-disk order.
pub const HEADER: [&str; 3] = ["timestamp", "kind", "notes"];

/// Naive layouts accepted in addition to RFC 3339.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Record store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the log file failed.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    /// The file is not valid CSV.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    /// A timestamp cell could not be parsed.
    #[error("invalid timestamp on line {line}: {timestamp:?}")]
    TimestampParse { line: u64, timestamp: String },
    /// A kind cell was neither `in` nor `out`.
    #[error("invalid kind on line {line}: {source}")]
    InvalidKind {
        line: u64,
        #[source]
        source: UnknownEventKind,
    },
    /// A row has more cells than the header and they cannot be folded into `notes`.
    #[error("line {line} has {found} fields, expected {expected}")]
    ExtraFields {
        line: u64,
        expected: usize,
        found: usize,
    },
    /// The header lacks a required column.
    #[error("header is missing the {0:?} column")]
    MissingColumn(&'static str),
}

/// One CSV row, as text.
#[derive(Debug, Deserialize)]
struct Row {
    timestamp: String,
    kind: String,
    #[serde(default)]
    notes: String,
}

impl Row {
    fn into_event(self, line: u64) -> Result<Event, StoreError> {
        let timestamp =
            parse_timestamp(&self.timestamp).ok_or_else(|| StoreError::TimestampParse {
                line,
                timestamp: self.timestamp.clone(),
            })?;
        let kind: EventKind = self
            .kind
            .parse()
            .map_err(|source| StoreError::InvalidKind { line, source })?;
        Ok(Event::new(timestamp, kind, self.notes))
    }
}

/// Parses a header line, trimming each column name.
fn parse_header(line: &str) -> Result<StringRecord, StoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(line.as_bytes());
    let header = reader.records().next().transpose()?.unwrap_or_default();
    check_header(&header)?;
    Ok(header.iter().map(str::trim).collect())
}

fn check_header(header: &StringRecord) -> Result<(), StoreError> {
    for required in ["timestamp", "kind"] {
        if !header.iter().any(|column| column.trim() == required) {
            return Err(StoreError::MissingColumn(required));
        }
    }
    Ok(())
}

/// Lays `event` out in the column order of `header`. Unknown columns stay empty.
fn record_for(header: &StringRecord, event: &Event) -> Vec<String> {
    header
        .iter()
        .map(|column| match column {
            "timestamp" => format_timestamp(&event.timestamp),
            "kind" => event.kind.to_string(),
            "notes" => event.notes.clone(),
            _ => String::new(),
        })
        .collect()
}

/// Trims every cell, folding cells past the header width back into `notes`.
///
/// Older logs were written without quoting, so a comma inside a note splits it
/// across several cells. Folding only works when `notes` is the last column.
fn normalize_record(
    raw: &StringRecord,
    header: &StringRecord,
    line: u64,
) -> Result<StringRecord, StoreError> {
    let width = header.len();
    if raw.len() <= width {
        return Ok(raw.iter().map(str::trim).collect());
    }

    match header.iter().position(|column| column == "notes") {
        Some(notes) if notes + 1 == width => {
            let mut record: StringRecord = raw.iter().take(notes).map(str::trim).collect();
            let overflow: Vec<&str> = raw.iter().skip(notes).collect();
            record.push_field(overflow.join(",").trim());
            Ok(record)
        }
        _ => Err(StoreError::ExtraFields {
            line,
            expected: width,
            found: raw.len(),
        }),
    }
}

/// Parses a timestamp cell: RFC 3339 first, then the naive layouts in local time.
pub fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())?;

    match Local.from_local_datetime(&naive).earliest() {
        Some(dt) => Some(dt.fixed_offset()),
        // Wall-clock time skipped by a DST jump: borrow the offset in effect at that instant.
        None => {
            let offset = Local.offset_from_utc_datetime(&naive);
            naive.and_local_timezone(offset).single()
        }
    }
}

/// Renders a timestamp the way new records are written.
pub fn format_timestamp(timestamp: &DateTime<FixedOffset>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// The CSV event log on disk.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    /// Opens the log at `path`, creating it (and its directory) with only a header if missing.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let mut file = fs::File::create(path)?;
            writeln!(file, "{}", HEADER.join(","))?;
            tracing::info!(path = %path.display(), "created new event log");
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns every record, newest first.
    pub fn load(&self) -> Result<Vec<Event>, StoreError> {
        let mut events = self.read_file_order()?;
        events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        tracing::debug!(path = %self.path.display(), count = events.len(), "loaded event log");
        Ok(events)
    }

    /// Returns the `n` newest records.
    pub fn head(&self, n: usize) -> Result<Vec<Event>, StoreError> {
        let mut events = self.load()?;
        events.truncate(n);
        Ok(events)
    }

    /// Returns the newest record, if any.
    pub fn latest(&self) -> Result<Option<Event>, StoreError> {
        Ok(self.load()?.into_iter().next())
    }

    /// Writes `event` directly below the header, in that header's column order,
    /// leaving the rest of the file untouched.
    pub fn prepend(&self, event: &Event) -> Result<(), StoreError> {
        let existing = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };
        let (header_line, body) = match existing.split_once('\n') {
            Some((header_line, body)) => (header_line.to_string(), body),
            None if existing.trim().is_empty() => (HEADER.join(","), ""),
            None => (existing.clone(), ""),
        };
        // The existing header is kept verbatim and decides the column order.
        let header = parse_header(&header_line)?;

        let mut contents = Vec::with_capacity(existing.len() + 64);
        contents.extend_from_slice(header_line.as_bytes());
        contents.push(b'\n');
        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(&mut contents);
            writer.write_record(record_for(&header, event))?;
            writer.flush()?;
        }
        contents.extend_from_slice(body.as_bytes());

        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, &contents)?;
        fs::rename(&tmp_path, &self.path)?;

        tracing::debug!(kind = %event.kind, timestamp = %event.timestamp, "recorded event");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Reads records in on-disk order, matching columns by header name.
    fn read_file_order(&self) -> Result<Vec<Event>, StoreError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)?;
        let header: StringRecord = reader.headers()?.iter().map(str::trim).collect();
        if header.is_empty() {
            return Ok(Vec::new());
        }
        check_header(&header)?;

        let mut events = Vec::new();
        for result in reader.records() {
            let raw = result?;
            let line = raw.position().map_or(0, csv::Position::line);
            let record = normalize_record(&raw, &header, line)?;
            let row: Row = record.deserialize(Some(&header))?;
            events.push(row.into_event(line)?);
        }
        Ok(events)
    }
}
