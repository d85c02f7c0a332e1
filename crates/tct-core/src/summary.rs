//! Session and per-subject result values.
//!
//! Both summary types are produced whole by one [`crate::analyze`] call and
//! never mutated afterwards, so they can be shared across threads freely.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::event::{ChamberEvent, Zone};
use crate::types::SubjectId;

/// Accumulated dwell time per zone, in milliseconds.
///
/// All three zones are always present; an unvisited zone reads zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZoneDwell {
    pub empty_ms: i64,
    pub middle_ms: i64,
    pub stranger_ms: i64,
}

impl ZoneDwell {
    /// Dwell time for one zone.
    #[must_use]
    pub const fn get(&self, zone: Zone) -> i64 {
        match zone {
            Zone::Empty => self.empty_ms,
            Zone::Middle => self.middle_ms,
            Zone::Stranger => self.stranger_ms,
        }
    }

    /// Adds `delta_ms` to one zone's accumulated dwell.
    pub const fn add(&mut self, zone: Zone, delta_ms: i64) {
        match zone {
            Zone::Empty => self.empty_ms += delta_ms,
            Zone::Middle => self.middle_ms += delta_ms,
            Zone::Stranger => self.stranger_ms += delta_ms,
        }
    }

    /// Total dwell across all three zones.
    #[must_use]
    pub const fn total_ms(&self) -> i64 {
        self.empty_ms + self.middle_ms + self.stranger_ms
    }
}

/// Per-subject session result.
///
/// Invariant: the three zone dwells sum exactly to
/// `last_event − first_event` in millisecond coordinates; the accumulation
/// neither double-counts nor leaves gaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MouseSummary {
    /// The subject these statistics belong to.
    pub subject: SubjectId,

    /// Accumulated dwell per zone.
    pub dwell: ZoneDwell,

    /// Number of adjacent event pairs whose zones differ.
    pub switch_count: u32,

    /// The subject's first observed timestamp.
    pub first_event: DateTime<Utc>,

    /// The subject's effective last timestamp. This is the session end, not
    /// the raw last event, so every subject closes at a common instant.
    pub last_event: DateTime<Utc>,
}

impl MouseSummary {
    /// Total dwell across all zones.
    #[must_use]
    pub const fn total_dwell_ms(&self) -> i64 {
        self.dwell.total_ms()
    }
}

/// Session-level result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    /// Earliest timestamp among all events.
    pub started_at: DateTime<Utc>,

    /// Caller-supplied session end, at or after every event.
    pub ended_at: DateTime<Utc>,

    /// Per-subject results, keyed lexicographically.
    pub subjects: BTreeMap<SubjectId, MouseSummary>,

    /// The full event log, all subjects interleaved, stably sorted by
    /// timestamp. Retained verbatim for audit export.
    pub events: Vec<ChamberEvent>,
}

impl SessionSummary {
    /// Session length in milliseconds, always non-negative.
    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        self.ended_at.timestamp_millis() - self.started_at.timestamp_millis()
    }
}
