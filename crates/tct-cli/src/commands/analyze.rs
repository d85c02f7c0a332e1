//! Score a session and print or save the result.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tct_core::render::{format_clock, format_seconds, format_timestamp};
use tct_core::{Protocol, SessionRecord, SessionSummary, Zone, zone_label};
use tct_store::HistoryStore;

use super::events;

/// Scores the event log at `events_path` and writes the result.
///
/// When `store` is given, the resulting session record is inserted and its ID
/// reported; in JSON mode the confirmation goes to stderr and stdout carries
/// only the record. Scoring without `--save` never touches the history
/// database.
pub fn run<W: Write>(
    writer: &mut W,
    events_path: &Path,
    end: Option<&str>,
    protocol: Protocol,
    json: bool,
    store: Option<&mut HistoryStore>,
) -> Result<()> {
    let events = events::load_events(events_path)?;
    let session_end = events::resolve_session_end(&events, end)?;
    let summary =
        tct_core::analyze(&events, session_end).context("failed to score session")?;
    let record = SessionRecord::from_summary(&summary, protocol);

    if json {
        let rendered = serde_json::to_string_pretty(&record)?;
        writeln!(writer, "{rendered}")?;
    } else {
        write_session(writer, &summary, protocol)?;
    }

    if let Some(store) = store {
        let id = store.insert(&record)?;
        if json {
            eprintln!("Saved session {id}");
        } else {
            writeln!(writer)?;
            writeln!(writer, "Saved session {id}")?;
        }
    }

    Ok(())
}

fn write_session<W: Write>(
    writer: &mut W,
    summary: &SessionSummary,
    protocol: Protocol,
) -> Result<()> {
    writeln!(writer, "Protocol:  {protocol}")?;
    writeln!(writer, "Started:   {}", format_timestamp(summary.started_at))?;
    writeln!(writer, "Ended:     {}", format_timestamp(summary.ended_at))?;
    writeln!(writer, "Duration:  {}", format_clock(summary.duration_ms()))?;
    writeln!(writer)?;

    let labels = Zone::ALL.map(|zone| format!("{} (s)", zone_label(protocol, zone)));
    writeln!(
        writer,
        "{:<12} {:>14} {:>14} {:>14} {:>14} {:>9}",
        "Mouse ID", labels[0], labels[1], labels[2], "Total (s)", "Switches"
    )?;
    for (subject, mouse) in &summary.subjects {
        writeln!(
            writer,
            "{:<12} {:>14} {:>14} {:>14} {:>14} {:>9}",
            subject.as_str(),
            format_seconds(mouse.dwell.get(Zone::Empty)),
            format_seconds(mouse.dwell.get(Zone::Middle)),
            format_seconds(mouse.dwell.get(Zone::Stranger)),
            format_seconds(mouse.total_dwell_ms()),
            mouse.switch_count,
        )?;
    }

    Ok(())
}
