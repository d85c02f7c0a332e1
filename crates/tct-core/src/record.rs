//! The persisted session record.
//!
//! One JSON record per completed session: protocol, bounds, duration,
//! subject count, and a per-subject map of millisecond/count values. This is
//! the unit the history store keeps and the shape `--json` output emits.
//! Conversion from and back to [`MouseSummary`] values is lossless: every
//! summary is normalized to the session end, and the dwell-sum invariant
//! makes `first_event` recoverable as `ended_at − total dwell`.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::event::Zone;
use crate::protocol::Protocol;
use crate::summary::{MouseSummary, SessionSummary, ZoneDwell};
use crate::types::{SubjectId, ValidationError};

/// Per-subject slice of a [`SessionRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectRecord {
    /// Dwell in the empty chamber, milliseconds.
    #[serde(rename = "empty")]
    pub empty_ms: i64,

    /// Dwell in the middle chamber, milliseconds.
    #[serde(rename = "middle")]
    pub middle_ms: i64,

    /// Dwell in the stranger chamber, milliseconds.
    #[serde(rename = "stranger")]
    pub stranger_ms: i64,

    /// Zone-switch count.
    pub switches: u32,
}

/// One completed session, as persisted by the history store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Which protocol phase the session ran.
    pub protocol: Protocol,

    /// Earliest event timestamp.
    pub started_at: DateTime<Utc>,

    /// Caller-supplied session end.
    pub ended_at: DateTime<Utc>,

    /// `ended_at − started_at` in milliseconds.
    pub duration_ms: i64,

    /// Number of distinct subjects observed.
    pub subject_count: usize,

    /// Per-subject statistics, keyed by subject ID.
    pub subjects: BTreeMap<String, SubjectRecord>,
}

impl SessionRecord {
    /// Builds the persisted record for a completed analysis.
    #[must_use]
    pub fn from_summary(summary: &SessionSummary, protocol: Protocol) -> Self {
        let subjects = summary
            .subjects
            .iter()
            .map(|(id, mouse)| {
                (
                    id.to_string(),
                    SubjectRecord {
                        empty_ms: mouse.dwell.get(Zone::Empty),
                        middle_ms: mouse.dwell.get(Zone::Middle),
                        stranger_ms: mouse.dwell.get(Zone::Stranger),
                        switches: mouse.switch_count,
                    },
                )
            })
            .collect();

        Self {
            protocol,
            started_at: summary.started_at,
            ended_at: summary.ended_at,
            duration_ms: summary.duration_ms(),
            subject_count: summary.subjects.len(),
            subjects,
        }
    }

    /// Reconstructs the per-subject summaries this record was built from.
    ///
    /// `last_event` is the recorded session end for every subject, and
    /// `first_event` falls out of the dwell-sum invariant. Fails only when a
    /// stored subject key is not a valid subject ID.
    pub fn to_summaries(&self) -> Result<BTreeMap<SubjectId, MouseSummary>, ValidationError> {
        let mut summaries = BTreeMap::new();
        for (id, record) in &self.subjects {
            let subject = SubjectId::new(id.clone())?;
            let dwell = ZoneDwell {
                empty_ms: record.empty_ms,
                middle_ms: record.middle_ms,
                stranger_ms: record.stranger_ms,
            };
            let first_event = self.ended_at - Duration::milliseconds(dwell.total_ms());
            summaries.insert(
                subject.clone(),
                MouseSummary {
                    subject,
                    dwell,
                    switch_count: record.switches,
                    first_event,
                    last_event: self.ended_at,
                },
            );
        }
        Ok(summaries)
    }
}
