//! Reconstructing sessions from a loosely-validated event log.
//!
//! The log is expected to alternate `in`/`out` but nothing enforces it. Pairing
//! walks the events newest-first and applies two lenient rules:
//!
//! - consecutive `out` events keep only the one closest to the next `in`
//!   (the oldest of the run, since it is seen last);
//! - an `in` with no pending `out` is an orphan and is dropped.
//!
//! A log whose newest event is an `in` is closed with a synthetic `out` at `now`.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::event::{Event, EventKind};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// A completed `in`/`out` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub check_in: DateTime<FixedOffset>,
    pub check_out: DateTime<FixedOffset>,
    /// Notes of the `in` event.
    pub notes: String,
    /// The `out` side was synthesized from the clock.
    pub inferred: bool,
}

impl Session {
    /// Elapsed fractional hours. Negative when the log has out-of-order timestamps.
    #[allow(clippy::cast_precision_loss)]
    pub fn hours(&self) -> f64 {
        (self.check_out - self.check_in).num_milliseconds() as f64 / MILLIS_PER_HOUR
    }
}

/// Returns the synthetic close for a log whose newest event is still open.
pub fn infer_closing_event(events: &[Event], now: DateTime<FixedOffset>) -> Option<Event> {
    events
        .first()
        .filter(|newest| newest.is_check_in())
        .map(|_| Event::inferred_close(now))
}

/// Pairs a newest-first event sequence into sessions, newest first.
pub fn pair_sessions(events: &[Event], now: DateTime<FixedOffset>) -> Vec<Session> {
    let inferred = infer_closing_event(events, now);
    if inferred.is_some() {
        tracing::debug!(%now, "log ends on an open check-in, closing it at the current time");
    }

    let mut sessions = Vec::new();
    let mut pending_out: Option<(DateTime<FixedOffset>, bool)> = None;

    for (idx, event) in inferred.iter().chain(events.iter()).enumerate() {
        match event.kind {
            EventKind::CheckOut => {
                let synthetic = inferred.is_some() && idx == 0;
                pending_out = Some((event.timestamp, synthetic));
            }
            EventKind::CheckIn => {
                let Some((check_out, synthetic)) = pending_out.take() else {
                    tracing::trace!(timestamp = %event.timestamp, "dropping orphan check-in");
                    continue;
                };
                sessions.push(Session {
                    check_in: event.timestamp,
                    check_out,
                    notes: event.notes.clone(),
                    inferred: synthetic,
                });
            }
        }
    }

    sessions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn ev(s: &str, kind: EventKind, notes: &str) -> Event {
        Event::new(ts(s), kind, notes)
    }

    #[test]
    fn pairs_alternating_log() {
        let events = vec![
            ev("2022-01-02T08:00:00Z", EventKind::CheckOut, ""),
            ev("2022-01-02T07:00:00Z", EventKind::CheckIn, "second"),
            ev("2022-01-01T06:00:00Z", EventKind::CheckOut, ""),
            ev("2022-01-01T05:00:00Z", EventKind::CheckIn, "first"),
        ];
        let sessions = pair_sessions(&events, ts("2022-01-03T00:00:00Z"));

        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].notes, "second");
        assert_eq!(sessions[1].notes, "first");
        assert!(sessions.iter().all(|s| (s.hours() - 1.0).abs() < f64::EPSILON));
        assert!(sessions.iter().all(|s| !s.inferred));
    }

    #[test]
    fn open_check_in_is_closed_at_now() {
        let events = vec![ev("2024-01-02T08:00:00Z", EventKind::CheckIn, "")];
        let now = ts("2024-01-02T10:30:00Z");
        let sessions = pair_sessions(&events, now);

        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].check_out, now);
        assert!(sessions[0].inferred);
        assert!((sessions[0].hours() - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn closed_log_gets_no_inferred_event() {
        let events = vec![
            ev("2024-01-02T12:00:00Z", EventKind::CheckOut, ""),
            ev("2024-01-02T08:00:00Z", EventKind::CheckIn, ""),
        ];
        assert!(infer_closing_event(&events, ts("2024-01-03T00:00:00Z")).is_none());
        assert!(infer_closing_event(&[], ts("2024-01-03T00:00:00Z")).is_none());
    }

    #[test]
    fn consecutive_outs_keep_the_last_seen() {
        let events = vec![
            ev("2024-01-02T12:00:00Z", EventKind::CheckOut, ""),
            ev("2024-01-02T11:00:00Z", EventKind::CheckOut, ""),
            ev("2024-01-02T08:00:00Z", EventKind::CheckIn, ""),
        ];
        let sessions = pair_sessions(&events, ts("2024-01-03T00:00:00Z"));

        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].check_out, ts("2024-01-02T11:00:00Z"));
        assert!((sessions[0].hours() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn orphan_check_in_is_dropped() {
        let events = vec![
            ev("2024-01-02T12:00:00Z", EventKind::CheckOut, ""),
            ev("2024-01-02T08:00:00Z", EventKind::CheckIn, "kept"),
            ev("2024-01-02T07:00:00Z", EventKind::CheckIn, "orphan"),
        ];
        let sessions = pair_sessions(&events, ts("2024-01-03T00:00:00Z"));

        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].notes, "kept");
    }

    #[test]
    fn out_of_order_timestamps_give_negative_hours() {
        let events = vec![
            ev("2024-01-02T08:00:00Z", EventKind::CheckOut, ""),
            ev("2024-01-02T10:00:00Z", EventKind::CheckIn, ""),
        ];
        let sessions = pair_sessions(&events, ts("2024-01-03T00:00:00Z"));

        assert_eq!(sessions.len(), 1);
        assert!((sessions[0].hours() + 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn duration_spans_offsets_correctly() {
        // Same instant-difference regardless of the offsets the two ends were written in.
        let events = vec![
            ev("2024-03-31T12:00:00+02:00", EventKind::CheckOut, ""),
            ev("2024-03-31T08:00:00+01:00", EventKind::CheckIn, ""),
        ];
        let sessions = pair_sessions(&events, ts("2024-04-01T00:00:00Z"));
        assert!((sessions[0].hours() - 3.0).abs() < f64::EPSILON);
    }
}
