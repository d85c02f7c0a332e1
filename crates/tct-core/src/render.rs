//! Delimited report rendering.
//!
//! Renders a [`SessionSummary`] into a flat text document for spreadsheet
//! import, in two shapes: a summary-only metrics table, and a full record
//! table that carries per-zone `summary` rows plus raw `event` rows for
//! pivoting. The delimiter (comma or tab) is the only other behavioral
//! parameter; both produce byte-identical documents apart from the separator
//! character. Rendering performs no I/O and never fails.

use std::fmt::Write;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::event::Zone;
use crate::summary::SessionSummary;

/// Title line of every report document.
pub const REPORT_TITLE: &str = "Three-Chamber Session Report";

/// Field separator for the rendered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Tab,
}

impl Delimiter {
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Comma => ',',
            Self::Tab => '\t',
        }
    }
}

/// Which of the two document shapes to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportMode {
    /// Header block plus the per-subject metrics table.
    #[default]
    Summary,
    /// Header block plus the tagged `summary`/`event` record table.
    Full,
}

/// Renders the report document for `summary`.
pub fn render_delimited(
    summary: &SessionSummary,
    delimiter: Delimiter,
    mode: ReportMode,
) -> String {
    let sep = delimiter.as_char();
    let mut output = String::new();

    writeln!(output, "{REPORT_TITLE}").unwrap();
    writeln!(output).unwrap();
    writeln!(
        output,
        "Session Start{sep}{}",
        format_timestamp(summary.started_at)
    )
    .unwrap();
    writeln!(
        output,
        "Session End{sep}{}",
        format_timestamp(summary.ended_at)
    )
    .unwrap();
    writeln!(
        output,
        "Total Duration{sep}{}",
        format_clock(summary.duration_ms())
    )
    .unwrap();
    writeln!(output).unwrap();

    match mode {
        ReportMode::Summary => write_metrics_table(&mut output, summary, sep),
        ReportMode::Full => write_record_table(&mut output, summary, sep),
    }

    output
}

fn write_metrics_table(output: &mut String, summary: &SessionSummary, sep: char) {
    writeln!(
        output,
        "Mouse ID{sep}Empty (s){sep}Middle (s){sep}Stranger (s){sep}Total Dwell (s){sep}Switch Count"
    )
    .unwrap();
    for (subject, mouse) in &summary.subjects {
        writeln!(
            output,
            "{}{sep}{}{sep}{}{sep}{}{sep}{}{sep}{}",
            escape_field(subject.as_str()),
            format_seconds(mouse.dwell.get(Zone::Empty)),
            format_seconds(mouse.dwell.get(Zone::Middle)),
            format_seconds(mouse.dwell.get(Zone::Stranger)),
            format_seconds(mouse.total_dwell_ms()),
            mouse.switch_count,
        )
        .unwrap();
    }
}

fn write_record_table(output: &mut String, summary: &SessionSummary, sep: char) {
    writeln!(
        output,
        "Record Type{sep}Mouse ID{sep}Zone{sep}Time (s){sep}Switch Count{sep}Timestamp"
    )
    .unwrap();
    for (subject, mouse) in &summary.subjects {
        for zone in Zone::ALL {
            writeln!(
                output,
                "summary{sep}{}{sep}{}{sep}{}{sep}{}{sep}",
                escape_field(subject.as_str()),
                zone.display_name(),
                format_seconds(mouse.dwell.get(zone)),
                mouse.switch_count,
            )
            .unwrap();
        }
    }
    let start_ms = summary.started_at.timestamp_millis();
    for event in &summary.events {
        writeln!(
            output,
            "event{sep}{}{sep}{}{sep}{}{sep}{sep}{}",
            escape_field(event.subject.as_str()),
            event.zone.display_name(),
            format_seconds(event.timestamp.timestamp_millis() - start_ms),
            format_timestamp(event.timestamp),
        )
        .unwrap();
    }
}

/// Milliseconds as seconds with exactly three decimal digits.
#[must_use]
pub fn format_seconds(ms: i64) -> String {
    let ms = ms.max(0);
    format!("{}.{:03}", ms / 1000, ms % 1000)
}

/// Milliseconds as an `HHh MMm SSs` clock string, hour segment omitted when
/// zero, sub-second remainder truncated.
#[must_use]
pub fn format_clock(ms: i64) -> String {
    let total_seconds = ms.max(0) / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    if hours > 0 {
        format!("{hours:02}h {minutes:02}m {seconds:02}s")
    } else {
        format!("{minutes:02}m {seconds:02}s")
    }
}

/// RFC 3339 with millisecond precision and a `Z` suffix.
#[must_use]
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Quotes a field that contains a comma, tab, quote, or newline, doubling
/// any embedded quotes. The decision ignores the active delimiter so the
/// comma and tab documents differ only in the separator character itself.
fn escape_field(value: &str) -> String {
    if value.contains([',', '\t', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
