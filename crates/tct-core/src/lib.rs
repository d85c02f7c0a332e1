//! Core scoring logic for the three-chamber sociability test.
//!
//! This crate contains the pure parts of the scorer:
//! - Analysis: reducing chamber occupancy events into per-subject dwell and
//!   switch statistics ([`analyze`])
//! - Rendering: flat delimited report documents for spreadsheet import
//! - Records: the persisted session shape used by the history store
//! - Protocol labels and the capture roster, layered on top of the analyzer
//!
//! Everything here is synchronous and side-effect free; event capture,
//! storage, and presentation live in the surrounding crates.

mod analyze;
mod event;
pub mod protocol;
pub mod record;
pub mod render;
pub mod roster;
mod summary;
mod types;

pub use analyze::analyze;
pub use event::{ChamberEvent, Zone};
pub use protocol::{Protocol, zone_label};
pub use record::{SessionRecord, SubjectRecord};
pub use render::{Delimiter, ReportMode, render_delimited};
pub use summary::{MouseSummary, SessionSummary, ZoneDwell};
pub use types::{SubjectId, ValidationError};
