//! Event-log loading shared by the scoring commands.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tct_core::ChamberEvent;

/// Loads a JSONL event log.
///
/// One event object per line; blank lines are skipped. A malformed line fails
/// the whole load with its line number so occupancy data is never silently
/// dropped from a scored session.
pub fn load_events(path: &Path) -> Result<Vec<ChamberEvent>> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut events = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read {}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        let event: ChamberEvent = serde_json::from_str(&line).with_context(|| {
            format!("invalid event on line {} of {}", index + 1, path.display())
        })?;
        events.push(event);
    }

    tracing::debug!(count = events.len(), path = %path.display(), "loaded event log");
    Ok(events)
}

/// Resolves the session end bound.
///
/// An explicit value must be RFC 3339; otherwise the latest event timestamp
/// closes the session, so the last occupancy contributes zero dwell.
pub fn resolve_session_end(
    events: &[ChamberEvent],
    end: Option<&str>,
) -> Result<DateTime<Utc>> {
    match end {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|parsed| parsed.with_timezone(&Utc))
            .with_context(|| format!("invalid session end: {raw}")),
        None => events
            .iter()
            .map(|event| event.timestamp)
            .max()
            .context("event log contains no events"),
    }
}
