//! Three-chamber test scorer CLI library.
//!
//! This crate provides the command-line interface for scoring chamber
//! occupancy event logs and managing the saved session history.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, ExportFormat, HistoryAction};
pub use config::Config;
