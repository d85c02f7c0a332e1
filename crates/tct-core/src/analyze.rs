//! Session reduction: dwell-time accumulation and zone-switch counting.
//!
//! # Algorithm summary
//!
//! 1. Validate the session bound against the earliest event
//! 2. Group events by subject; stable-sort each group by timestamp
//! 3. Walk each group once, attributing every inter-event delta to the zone
//!    the subject was in, counting a switch whenever the zone changes
//! 4. Close the final zone out at the caller-supplied session end
//!
//! All arithmetic happens in millisecond coordinates
//! ([`DateTime::timestamp_millis`]), so per-zone dwells telescope exactly to
//! `session_end − first_event` with no float drift and no rounding gaps.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::event::ChamberEvent;
use crate::summary::{MouseSummary, SessionSummary, ZoneDwell};
use crate::types::{SubjectId, ValidationError};

/// Reduces an event log plus a session bound into a [`SessionSummary`].
///
/// The input may arrive in any order; events are grouped by subject and
/// stably sorted by timestamp, so ties keep their input order. The first
/// invariant violation aborts the whole analysis; no partial summary is ever
/// produced. Equal timestamps (zero delta) are valid, negative deltas are
/// not.
pub fn analyze(
    events: &[ChamberEvent],
    session_end: DateTime<Utc>,
) -> Result<SessionSummary, ValidationError> {
    let Some(first) = events.iter().min_by_key(|event| event.timestamp) else {
        return Err(ValidationError::EmptyInput);
    };
    let session_start = first.timestamp;
    if session_end.timestamp_millis() < session_start.timestamp_millis() {
        return Err(ValidationError::InvalidSessionBound {
            start: session_start,
            end: session_end,
        });
    }

    let mut groups: BTreeMap<SubjectId, Vec<ChamberEvent>> = BTreeMap::new();
    for event in events {
        groups
            .entry(event.subject.clone())
            .or_default()
            .push(event.clone());
    }

    let mut subjects = BTreeMap::new();
    for (subject, mut group) in groups {
        group.sort_by_key(|event| event.timestamp);
        verify_order(&subject, &group)?;
        let summary = reduce_subject(&subject, &group, session_end)?;
        subjects.insert(subject, summary);
    }

    let mut log = events.to_vec();
    log.sort_by_key(|event| event.timestamp);

    tracing::debug!(
        subjects = subjects.len(),
        events = log.len(),
        "session reduced"
    );

    Ok(SessionSummary {
        started_at: session_start,
        ended_at: session_end,
        subjects,
        events: log,
    })
}

/// Confirms that a sorted group never steps backwards in millisecond
/// coordinates. Unreachable through [`analyze`] after a correct stable sort;
/// kept as a guard against comparator anomalies.
fn verify_order(subject: &SubjectId, ordered: &[ChamberEvent]) -> Result<(), ValidationError> {
    for (previous, event) in ordered.iter().zip(ordered.iter().skip(1)) {
        if event.timestamp.timestamp_millis() < previous.timestamp.timestamp_millis() {
            return Err(ValidationError::UnorderedEvents {
                subject: subject.clone(),
            });
        }
    }
    Ok(())
}

/// Single pass over one subject's time-sorted events.
fn reduce_subject(
    subject: &SubjectId,
    ordered: &[ChamberEvent],
    session_end: DateTime<Utc>,
) -> Result<MouseSummary, ValidationError> {
    let Some(first) = ordered.first() else {
        return Err(ValidationError::EmptyInput);
    };
    let Some(last) = ordered.last() else {
        return Err(ValidationError::EmptyInput);
    };
    let end_ms = session_end.timestamp_millis();
    if end_ms < last.timestamp.timestamp_millis() {
        return Err(ValidationError::SessionBoundTooEarly {
            subject: subject.clone(),
            last_event: last.timestamp,
            session_end,
        });
    }

    let mut dwell = ZoneDwell::default();
    let mut switch_count = 0_u32;
    let mut previous = first;
    for event in ordered.iter().skip(1) {
        let delta_ms =
            event.timestamp.timestamp_millis() - previous.timestamp.timestamp_millis();
        if delta_ms < 0 {
            return Err(ValidationError::NegativeDelta {
                subject: subject.clone(),
                delta_ms,
            });
        }
        dwell.add(previous.zone, delta_ms);
        if event.zone != previous.zone {
            switch_count += 1;
        }
        previous = event;
    }

    let tail_ms = end_ms - previous.timestamp.timestamp_millis();
    if tail_ms < 0 {
        return Err(ValidationError::NegativeDelta {
            subject: subject.clone(),
            delta_ms: tail_ms,
        });
    }
    dwell.add(previous.zone, tail_ms);

    Ok(MouseSummary {
        subject: subject.clone(),
        dwell,
        switch_count,
        first_event: first.timestamp,
        last_event: session_end,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{Duration, TimeZone};

    use crate::event::Zone;

    fn ts(seconds: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
            .single()
            .expect("valid test timestamp")
            + Duration::seconds(seconds)
    }

    fn subject(id: &str) -> SubjectId {
        SubjectId::new(id).expect("valid test subject")
    }

    fn ev(id: &str, zone: Zone, at: DateTime<Utc>) -> ChamberEvent {
        ChamberEvent::new(subject(id), zone, at)
    }

    fn mouse<'a>(summary: &'a SessionSummary, id: &str) -> &'a MouseSummary {
        summary
            .subjects
            .get(&subject(id))
            .expect("subject should be present")
    }

    // Scenario: one subject walks Empty -> Middle -> Stranger.
    #[test]
    fn single_subject_accumulates_per_zone() {
        let events = vec![
            ev("a", Zone::Empty, ts(0)),
            ev("a", Zone::Middle, ts(30)),
            ev("a", Zone::Stranger, ts(50)),
        ];

        let summary = analyze(&events, ts(80)).unwrap();
        let a = mouse(&summary, "a");

        assert_eq!(a.dwell.get(Zone::Empty), 30_000);
        assert_eq!(a.dwell.get(Zone::Middle), 20_000);
        assert_eq!(a.dwell.get(Zone::Stranger), 30_000);
        assert_eq!(a.switch_count, 2);
        assert_eq!(a.total_dwell_ms(), 80_000);
        assert_eq!(a.first_event, ts(0));
        assert_eq!(a.last_event, ts(80));
    }

    // Scenario: a second subject starting mid-session shares the same end.
    #[test]
    fn subjects_are_reduced_independently() {
        let events = vec![
            ev("a", Zone::Empty, ts(0)),
            ev("b", Zone::Middle, ts(10)),
            ev("a", Zone::Middle, ts(30)),
            ev("b", Zone::Empty, ts(40)),
            ev("a", Zone::Stranger, ts(50)),
        ];

        let summary = analyze(&events, ts(80)).unwrap();

        let a = mouse(&summary, "a");
        assert_eq!(a.dwell.get(Zone::Empty), 30_000);
        assert_eq!(a.dwell.get(Zone::Middle), 20_000);
        assert_eq!(a.dwell.get(Zone::Stranger), 30_000);
        assert_eq!(a.switch_count, 2);

        let b = mouse(&summary, "b");
        assert_eq!(b.dwell.get(Zone::Middle), 30_000);
        assert_eq!(b.dwell.get(Zone::Empty), 40_000);
        assert_eq!(b.dwell.get(Zone::Stranger), 0);
        assert_eq!(b.switch_count, 1);
        assert_eq!(b.first_event, ts(10));
        assert_eq!(b.last_event, ts(80));

        assert_eq!(summary.started_at, ts(0));
        assert_eq!(summary.ended_at, ts(80));
        assert_eq!(summary.duration_ms(), 80_000);
    }

    #[test]
    fn single_event_gets_full_span_and_no_switches() {
        let events = vec![ev("a", Zone::Empty, ts(0))];

        let summary = analyze(&events, ts(5)).unwrap();
        let a = mouse(&summary, "a");

        assert_eq!(a.dwell.get(Zone::Empty), 5_000);
        assert_eq!(a.dwell.get(Zone::Middle), 0);
        assert_eq!(a.dwell.get(Zone::Stranger), 0);
        assert_eq!(a.switch_count, 0);
    }

    #[test]
    fn event_at_session_end_gets_zero_dwell() {
        let events = vec![ev("a", Zone::Stranger, ts(42))];

        let summary = analyze(&events, ts(42)).unwrap();
        let a = mouse(&summary, "a");

        assert_eq!(a.total_dwell_ms(), 0);
        assert_eq!(a.switch_count, 0);
        assert_eq!(summary.duration_ms(), 0);
    }

    #[test]
    fn session_end_before_last_event_fails() {
        let events = vec![
            ev("a", Zone::Empty, ts(0)),
            ev("a", Zone::Middle, ts(50)),
        ];

        let err = analyze(&events, ts(40)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::SessionBoundTooEarly {
                subject: subject("a"),
                last_event: ts(50),
                session_end: ts(40),
            }
        );
    }

    #[test]
    fn session_end_before_first_event_fails_globally() {
        let events = vec![ev("a", Zone::Empty, ts(10))];

        let err = analyze(&events, ts(5)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidSessionBound {
                start: ts(10),
                end: ts(5),
            }
        );
    }

    #[test]
    fn empty_input_fails() {
        assert_eq!(analyze(&[], ts(0)), Err(ValidationError::EmptyInput));
    }

    #[test]
    fn unordered_input_is_sorted_before_reduction() {
        let shuffled = vec![
            ev("a", Zone::Stranger, ts(50)),
            ev("a", Zone::Empty, ts(0)),
            ev("a", Zone::Middle, ts(30)),
        ];
        let ordered = vec![
            ev("a", Zone::Empty, ts(0)),
            ev("a", Zone::Middle, ts(30)),
            ev("a", Zone::Stranger, ts(50)),
        ];

        assert_eq!(analyze(&shuffled, ts(80)), analyze(&ordered, ts(80)));
    }

    #[test]
    fn analysis_is_deterministic() {
        let events = vec![
            ev("b", Zone::Middle, ts(10)),
            ev("a", Zone::Empty, ts(0)),
            ev("b", Zone::Empty, ts(40)),
            ev("a", Zone::Middle, ts(30)),
        ];

        let once = analyze(&events, ts(60)).unwrap();
        let twice = analyze(&events, ts(60)).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn tied_timestamps_are_valid_and_keep_input_order() {
        // Two entries at the same instant: zero delta, one switch, and the
        // tail belongs to the zone that appeared later in the input.
        let events = vec![
            ev("a", Zone::Empty, ts(0)),
            ev("a", Zone::Middle, ts(20)),
            ev("a", Zone::Stranger, ts(20)),
        ];

        let summary = analyze(&events, ts(50)).unwrap();
        let a = mouse(&summary, "a");

        assert_eq!(a.dwell.get(Zone::Empty), 20_000);
        assert_eq!(a.dwell.get(Zone::Middle), 0);
        assert_eq!(a.dwell.get(Zone::Stranger), 30_000);
        assert_eq!(a.switch_count, 2);
        assert_eq!(
            summary.events.iter().map(|e| e.zone).collect::<Vec<_>>(),
            vec![Zone::Empty, Zone::Middle, Zone::Stranger]
        );
    }

    #[test]
    fn dwell_sums_equal_session_end_minus_first_event() {
        let events = vec![
            ev("a", Zone::Empty, ts(0)),
            ev("a", Zone::Middle, ts(7)),
            ev("a", Zone::Empty, ts(13)),
            ev("a", Zone::Stranger, ts(27)),
            ev("b", Zone::Stranger, ts(3)),
            ev("b", Zone::Middle, ts(31)),
        ];

        let end = ts(45);
        let summary = analyze(&events, end).unwrap();

        for entry in summary.subjects.values() {
            let span_ms =
                end.timestamp_millis() - entry.first_event.timestamp_millis();
            assert_eq!(entry.total_dwell_ms(), span_ms);
        }
    }

    #[test]
    fn switch_count_matches_differing_adjacent_pairs() {
        let events = vec![
            ev("a", Zone::Empty, ts(0)),
            ev("a", Zone::Empty, ts(5)),
            ev("a", Zone::Middle, ts(10)),
            ev("a", Zone::Middle, ts(15)),
            ev("a", Zone::Empty, ts(20)),
        ];

        let summary = analyze(&events, ts(30)).unwrap();
        // empty->empty, empty->middle, middle->middle, middle->empty
        assert_eq!(mouse(&summary, "a").switch_count, 2);
    }

    #[test]
    fn subjects_iterate_in_lexicographic_order() {
        let events = vec![
            ev("m10", Zone::Empty, ts(0)),
            ev("m2", Zone::Middle, ts(1)),
            ev("m1", Zone::Stranger, ts(2)),
        ];

        let summary = analyze(&events, ts(10)).unwrap();
        let order: Vec<_> = summary
            .subjects
            .keys()
            .map(|id| id.as_str().to_string())
            .collect();
        assert_eq!(order, vec!["m1", "m10", "m2"]);
    }

    #[test]
    fn event_log_is_retained_sorted_across_subjects() {
        let events = vec![
            ev("b", Zone::Middle, ts(10)),
            ev("a", Zone::Empty, ts(0)),
            ev("a", Zone::Stranger, ts(20)),
        ];

        let summary = analyze(&events, ts(30)).unwrap();
        let times: Vec<_> = summary.events.iter().map(|e| e.timestamp).collect();
        assert_eq!(times, vec![ts(0), ts(10), ts(20)]);
        assert_eq!(summary.events.len(), 3);
    }

    #[test]
    fn sub_second_deltas_accumulate_exactly() {
        let base = ts(0);
        let events = vec![
            ev("a", Zone::Empty, base),
            ev("a", Zone::Middle, base + Duration::milliseconds(333)),
            ev("a", Zone::Empty, base + Duration::milliseconds(999)),
        ];

        let summary = analyze(&events, base + Duration::milliseconds(1_500)).unwrap();
        let a = mouse(&summary, "a");

        assert_eq!(a.dwell.get(Zone::Empty), 333 + 501);
        assert_eq!(a.dwell.get(Zone::Middle), 666);
        assert_eq!(a.total_dwell_ms(), 1_500);
    }

    // The two guards below are unreachable through `analyze`, which sorts
    // and bound-checks first; they protect the internal contract of the
    // reduction helpers.

    #[test]
    fn verify_order_rejects_backwards_steps() {
        let group = vec![
            ev("a", Zone::Empty, ts(10)),
            ev("a", Zone::Middle, ts(0)),
        ];

        assert_eq!(
            verify_order(&subject("a"), &group),
            Err(ValidationError::UnorderedEvents {
                subject: subject("a"),
            })
        );
    }

    #[test]
    fn reduce_subject_rejects_negative_steps() {
        let group = vec![
            ev("a", Zone::Empty, ts(10)),
            ev("a", Zone::Middle, ts(0)),
        ];

        let err = reduce_subject(&subject("a"), &group, ts(60)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NegativeDelta {
                subject: subject("a"),
                delta_ms: -10_000,
            }
        );
    }
}
