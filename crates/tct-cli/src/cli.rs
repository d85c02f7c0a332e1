//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tct_core::{Delimiter, Protocol};

/// Three-chamber test session scorer.
#[derive(Debug, Parser)]
#[command(name = "tct", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Score an event log and print the session summary
    Analyze {
        /// Path to the JSONL event log
        events: PathBuf,

        /// Session end as RFC 3339; defaults to the latest event timestamp
        #[arg(long)]
        end: Option<String>,

        /// Protocol phase used for zone labels and the saved record
        #[arg(long)]
        protocol: Option<Protocol>,

        /// Print the session record as JSON instead of the table view
        #[arg(long)]
        json: bool,

        /// Save the session record to the history store
        #[arg(long)]
        save: bool,
    },

    /// Render a delimited report document from an event log
    Export {
        /// Path to the JSONL event log
        events: PathBuf,

        /// Session end as RFC 3339; defaults to the latest event timestamp
        #[arg(long)]
        end: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Include per-zone summary rows and raw event rows
        #[arg(long)]
        with_events: bool,

        /// Write the document to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Manage saved session records
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Show the configured subjects and their key bindings
    Roster,
}

/// Operations on the history store.
#[derive(Debug, Subcommand)]
pub enum HistoryAction {
    /// List saved sessions
    List,

    /// Print one saved session as JSON
    Show {
        /// Session ID
        id: String,
    },

    /// Delete one saved session
    Delete {
        /// Session ID
        id: String,
    },

    /// Delete all saved sessions
    Clear,
}

/// Delimiter choices for exported reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Comma-separated values
    Csv,
    /// Tab-separated values
    Tsv,
}

impl ExportFormat {
    pub const fn delimiter(self) -> Delimiter {
        match self {
            Self::Csv => Delimiter::Comma,
            Self::Tsv => Delimiter::Tab,
        }
    }
}
