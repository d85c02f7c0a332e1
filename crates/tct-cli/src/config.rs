//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use tct_core::Protocol;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the history database file
    pub history_path: PathBuf,

    /// Protocol phase assumed when a command does not pass one
    pub protocol: Protocol,

    /// Subject roster, in key-grid order
    pub subjects: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));

        Self {
            history_path: data_dir.join("history.db"),
            protocol: Protocol::default(),
            subjects: vec![
                String::from("m1"),
                String::from("m2"),
                String::from("m3"),
                String::from("m4"),
            ],
        }
    }
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Priority order (highest to lowest):
    /// 1. Environment variables (TCT_*)
    /// 2. Config file at default location
    /// 3. Default values
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but this is only called at startup"
    )]
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(None)
    }

    /// Load configuration with an optional explicit config file path.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but this is only called at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Add config file from default location
        if let Some(config_dir) = dirs_config_path() {
            let default_config = config_dir.join("config.toml");
            if default_config.exists() {
                figment = figment.merge(Toml::file(default_config));
            }
        }

        // Add explicit config file if provided
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Environment variables take precedence
        figment = figment.merge(Env::prefixed("TCT_"));

        figment.extract()
    }
}

/// Get the default config directory path.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tct"))
}

/// Get the default data directory path.
fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("tct"))
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.history_path.ends_with("history.db"));
        assert_eq!(config.protocol, Protocol::Sociability);
        assert_eq!(config.subjects, ["m1", "m2", "m3", "m4"]);
    }

    #[test]
    fn test_dirs_config_path() {
        if let Some(path) = dirs_config_path() {
            assert!(path.ends_with("tct"));
        }
    }

    #[test]
    fn test_dirs_data_path() {
        if let Some(path) = dirs_data_path() {
            assert!(path.ends_with("tct"));
        }
    }

    #[test]
    fn test_load_from_merges_explicit_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
history_path = "/tmp/tct-test/history.db"
subjects = ["c1", "c2"]
"#,
            )?;

            let config = Config::load_from(Some(Path::new("config.toml")))?;
            assert_eq!(
                config.history_path,
                PathBuf::from("/tmp/tct-test/history.db")
            );
            assert_eq!(config.subjects, ["c1", "c2"]);
            // Keys absent from the file keep their defaults
            assert_eq!(config.protocol, Protocol::Sociability);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file_values() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
protocol = "sociability"
subjects = ["c1", "c2"]
"#,
            )?;
            jail.set_env("TCT_PROTOCOL", "social_novelty");
            jail.set_env("TCT_SUBJECTS", r#"["x1", "x2"]"#);

            let config = Config::load_from(Some(Path::new("config.toml")))?;
            assert_eq!(config.protocol, Protocol::SocialNovelty);
            assert_eq!(config.subjects, ["x1", "x2"]);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.set_env("TCT_HISTORY_PATH", "/tmp/tct-test/env.db");

            let config = Config::load_from(None)?;
            assert_eq!(config.history_path, PathBuf::from("/tmp/tct-test/env.db"));
            Ok(())
        });
    }
}
