//! Clock abstraction and lenient timestamp parsing.
//!
//! Task timestamps arrive as caller-supplied strings in whatever shape the
//! persistence layer produced. Heuristics that need a calendar date go through
//! [`parse_timestamp`]; records whose timestamp does not parse are skipped by
//! the heuristic rather than failing the turn.

use crate::Timestamp;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;

    /// Current UTC calendar date.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// A clock pinned to one instant, for deterministic tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Timestamp);

impl FixedClock {
    /// Clock pinned to noon UTC on the given date.
    pub fn at_date(date: NaiveDate) -> Self {
        let noon = date.and_hms_opt(12, 0, 0).unwrap_or_default();
        Self(Utc.from_utc_datetime(&noon))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse a caller-supplied timestamp.
///
/// Accepts RFC 3339 (trailing `Z` or numeric offset), naive date-times
/// (treated as UTC) and bare dates (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    parse_naive(raw).map(|naive| Utc.from_utc_datetime(&naive))
}

/// Parse a caller-supplied timestamp as the writer's wall-clock time.
///
/// An offset is dropped rather than applied, so `23:30-05:00` stays on the
/// writer's calendar day. Calendar heuristics (streaks, daily counts,
/// weekday and time-of-day buckets) read timestamps this way.
pub fn parse_local_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    parse_naive(raw)
}

fn parse_naive(raw: &str) -> Option<NaiveDateTime> {
    // Tolerate a stray trailing Z
    let stripped = raw.strip_suffix('Z').unwrap_or(raw);
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(stripped, format) {
            return Some(naive);
        }
    }

    NaiveDate::parse_from_str(stripped, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

// ============================================================================
// TESTS
// ============================================================================
