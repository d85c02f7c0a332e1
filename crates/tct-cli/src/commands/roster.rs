//! Show the configured subjects and their key bindings.

use std::io::Write;

use anyhow::{Context, Result};
use tct_core::{Zone, roster::Roster};

use crate::Config;

pub fn run<W: Write>(writer: &mut W, config: &Config) -> Result<()> {
    let roster = Roster::with_default_bindings(config.subjects.iter().cloned())
        .context("invalid subject roster in configuration")?;

    writeln!(writer, "Subjects ({}):", roster.subjects().len())?;
    for subject in roster.subjects() {
        match roster.binding_for(subject) {
            Some(binding) => writeln!(
                writer,
                "- {subject}: empty={} middle={} stranger={}",
                binding.key_for(Zone::Empty),
                binding.key_for(Zone::Middle),
                binding.key_for(Zone::Stranger),
            )?,
            None => writeln!(writer, "- {subject}: no key row")?,
        }
    }

    Ok(())
}
