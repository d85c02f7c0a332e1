//! Render a delimited report document.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tct_core::{Delimiter, ReportMode, render_delimited};

use super::events;

/// Scores the event log and renders the delimited report document.
///
/// The document goes to `writer` unless an `output` path is given, in which
/// case the file is written in one call and a confirmation line goes to
/// `writer` instead.
pub fn run<W: Write>(
    writer: &mut W,
    events_path: &Path,
    end: Option<&str>,
    delimiter: Delimiter,
    mode: ReportMode,
    output: Option<&Path>,
) -> Result<()> {
    let events = events::load_events(events_path)?;
    let session_end = events::resolve_session_end(&events, end)?;
    let summary =
        tct_core::analyze(&events, session_end).context("failed to score session")?;
    let document = render_delimited(&summary, delimiter, mode);

    match output {
        Some(path) => {
            std::fs::write(path, &document)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::debug!(bytes = document.len(), path = %path.display(), "report written");
            writeln!(writer, "Wrote report to {}", path.display())?;
        }
        None => write!(writer, "{document}")?,
    }

    Ok(())
}
