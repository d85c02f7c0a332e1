//! Inspect and prune saved session records.

use std::io::Write;

use anyhow::Result;
use tct_core::render::{format_clock, format_timestamp};
use tct_store::HistoryStore;

pub fn list<W: Write>(writer: &mut W, store: &HistoryStore) -> Result<()> {
    let sessions = store.list()?;
    if sessions.is_empty() {
        writeln!(writer, "No saved sessions.")?;
        return Ok(());
    }

    writeln!(
        writer,
        "{:<36}  {:<24}  {:<14}  {:>11}  {:>8}",
        "ID", "Started", "Protocol", "Duration", "Subjects"
    )?;
    for session in sessions {
        writeln!(
            writer,
            "{:<36}  {:<24}  {:<14}  {:>11}  {:>8}",
            session.id,
            format_timestamp(session.record.started_at),
            session.record.protocol.as_str(),
            format_clock(session.record.duration_ms),
            session.record.subject_count,
        )?;
    }

    Ok(())
}

pub fn show<W: Write>(writer: &mut W, store: &HistoryStore, id: &str) -> Result<()> {
    let session = store.get(id)?;
    let rendered = serde_json::to_string_pretty(&session.record)?;
    writeln!(writer, "{rendered}")?;
    Ok(())
}

pub fn delete<W: Write>(writer: &mut W, store: &mut HistoryStore, id: &str) -> Result<()> {
    if store.delete(id)? {
        writeln!(writer, "Deleted session {id}")?;
    } else {
        writeln!(writer, "No session with ID {id}")?;
    }
    Ok(())
}

pub fn clear<W: Write>(writer: &mut W, store: &mut HistoryStore) -> Result<()> {
    let removed = store.clear()?;
    writeln!(writer, "Removed {removed} saved session(s)")?;
    Ok(())
}
