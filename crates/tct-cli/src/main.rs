use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tct_cli::commands::{analyze, export, history, roster};
use tct_cli::{Cli, Commands, Config, HistoryAction};
use tct_core::ReportMode;
use tct_store::HistoryStore;

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

/// Open the history store, ensuring its parent directory exists.
fn open_store(config: &Config) -> Result<HistoryStore> {
    if let Some(parent) = config.history_path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("failed to create history directory {}", parent.display())
        })?;
    }

    HistoryStore::open(&config.history_path).with_context(|| {
        format!("failed to open history store {}", config.history_path.display())
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let mut stdout = std::io::stdout().lock();

    match &cli.command {
        Some(Commands::Analyze {
            events,
            end,
            protocol,
            json,
            save,
        }) => {
            let config = load_config(cli.config.as_deref())?;
            let protocol = protocol.unwrap_or(config.protocol);
            let mut store = if *save { Some(open_store(&config)?) } else { None };
            analyze::run(
                &mut stdout,
                events,
                end.as_deref(),
                protocol,
                *json,
                store.as_mut(),
            )?;
        }
        Some(Commands::Export {
            events,
            end,
            format,
            with_events,
            output,
        }) => {
            let mode = if *with_events {
                ReportMode::Full
            } else {
                ReportMode::Summary
            };
            export::run(
                &mut stdout,
                events,
                end.as_deref(),
                format.delimiter(),
                mode,
                output.as_deref(),
            )?;
        }
        Some(Commands::History { action }) => {
            let config = load_config(cli.config.as_deref())?;
            let mut store = open_store(&config)?;
            match action {
                HistoryAction::List => history::list(&mut stdout, &store)?,
                HistoryAction::Show { id } => history::show(&mut stdout, &store, id)?,
                HistoryAction::Delete { id } => history::delete(&mut stdout, &mut store, id)?,
                HistoryAction::Clear => history::clear(&mut stdout, &mut store)?,
            }
        }
        Some(Commands::Roster) => {
            let config = load_config(cli.config.as_deref())?;
            roster::run(&mut stdout, &config)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
