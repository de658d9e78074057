//! Check-in/check-out events as they appear in the log.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Note attached to a check-out synthesized at aggregation time.
pub const INFERRED_NOTE: &str = "Inferred by takt.";

/// Whether an event opens or closes a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    CheckIn,
    CheckOut,
}

impl EventKind {
    /// Token used in the log file.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CheckIn => "in",
            Self::CheckOut => "out",
        }
    }

    /// Kind a new check should record given the newest event in the log.
    ///
    /// An empty log or a closed session starts a new session; an open one is closed.
    pub const fn next_after(latest: Option<Self>) -> Self {
        match latest {
            None | Some(Self::CheckOut) => Self::CheckIn,
            Some(Self::CheckIn) => Self::CheckOut,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in" => Ok(Self::CheckIn),
            "out" => Ok(Self::CheckOut),
            _ => Err(UnknownEventKind(s.to_string())),
        }
    }
}

impl Serialize for EventKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for event kind tokens other than `in` and `out`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEventKind(String);

impl fmt::Display for UnknownEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown event kind: {:?} (expected \"in\" or \"out\")", self.0)
    }
}

impl std::error::Error for UnknownEventKind {}

/// One entry of the append-only log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Wall-clock time the event was recorded, with the offset it was written in.
    pub timestamp: DateTime<FixedOffset>,
    pub kind: EventKind,
    /// Free-text annotation, possibly empty.
    #[serde(default)]
    pub notes: String,
}

impl Event {
    pub fn new(timestamp: DateTime<FixedOffset>, kind: EventKind, notes: impl Into<String>) -> Self {
        Self {
            timestamp,
            kind,
            notes: notes.into(),
        }
    }

    /// A check-out standing in for one the user has not recorded yet.
    pub fn inferred_close(now: DateTime<FixedOffset>) -> Self {
        Self::new(now, EventKind::CheckOut, INFERRED_NOTE)
    }

    /// Whether this event opens a session.
    pub fn is_check_in(&self) -> bool {
        self.kind == EventKind::CheckIn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tokens_roundtrip() {
        for kind in [EventKind::CheckIn, EventKind::CheckOut] {
            let parsed: EventKind = kind.to_string().parse().expect("should parse");
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn kind_parse_is_lenient_about_case_and_padding() {
        assert_eq!(" IN ".parse::<EventKind>().unwrap(), EventKind::CheckIn);
        assert_eq!("Out".parse::<EventKind>().unwrap(), EventKind::CheckOut);
    }

    #[test]
    fn unknown_kind_errors() {
        let err = "pause".parse::<EventKind>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown event kind: \"pause\" (expected \"in\" or \"out\")"
        );
    }

    #[test]
    fn next_kind_alternates() {
        assert_eq!(EventKind::next_after(None), EventKind::CheckIn);
        assert_eq!(
            EventKind::next_after(Some(EventKind::CheckOut)),
            EventKind::CheckIn
        );
        assert_eq!(
            EventKind::next_after(Some(EventKind::CheckIn)),
            EventKind::CheckOut
        );
    }

    #[test]
    fn only_check_ins_open_sessions() {
        let ts = DateTime::parse_from_rfc3339("2024-01-02T08:00:00+00:00").unwrap();
        assert!(Event::new(ts, EventKind::CheckIn, "").is_check_in());
        assert!(!Event::new(ts, EventKind::CheckOut, "").is_check_in());
    }

    #[test]
    fn inferred_close_is_a_check_out_with_system_note() {
        let now = DateTime::parse_from_rfc3339("2024-01-02T12:00:00+01:00").unwrap();
        let event = Event::inferred_close(now);
        assert_eq!(event.kind, EventKind::CheckOut);
        assert_eq!(event.notes, INFERRED_NOTE);
        assert_eq!(event.timestamp, now);
    }

    #[test]
    fn event_serializes_kind_as_token() {
        let ts = DateTime::parse_from_rfc3339("2024-01-02T08:00:00+00:00").unwrap();
        let event = Event::new(ts, EventKind::CheckIn, "standup");
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""kind":"in""#), "got {json}");

        let parsed: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }
}
