//! CLI argument definitions for the Headline application.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Headline - ranks news headlines from many sources into a short,
/// deduplicated, source-diverse list.
#[derive(Parser, Debug)]
#[command(name = "headline", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Data directory for delivered state.
    #[arg(short = 'd', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rank new headlines and mark the selection as delivered.
    Rank {
        /// JSON files holding arrays of documents, one source per file.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        #[arg(short = 'n', long = "max-items")]
        max_items: Option<usize>,

        #[arg(long = "max-age-hours")]
        max_age_hours: Option<u32>,

        /// Skip the Hacker News and Reddit lookups.
        #[arg(long = "no-social")]
        no_social: bool,
    },

    /// Best headlines of the last 24 hours. Read-only.
    Top {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        #[arg(short = 'n', long = "max-items")]
        max_items: Option<usize>,

        #[arg(long = "no-social")]
        no_social: bool,
    },

    /// Final-pass near-duplicate removal over one input file, order kept.
    Dedup { input: PathBuf },

    /// Print the effective configuration as TOML.
    Config,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > HEADLINE_CONFIG env var > ~/.headline/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("HEADLINE_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the data directory.
    ///
    /// Priority: --data-dir flag > config file value (with `~` expanded).
    pub fn resolve_data_dir(&self, config_data_dir: &str) -> PathBuf {
        match self.data_dir {
            Some(ref p) => p.clone(),
            None => expand_home(config_data_dir),
        }
    }

    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }
}

fn home_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    let home = std::env::var("USERPROFILE");
    #[cfg(not(target_os = "windows"))]
    let home = std::env::var("HOME");
    home.ok().map(PathBuf::from)
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        Some(rest) => home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(rest),
        None => PathBuf::from(path),
    }
}

fn default_config_path() -> PathBuf {
    match home_dir() {
        Some(home) => home.join(".headline").join("config.toml"),
        None => PathBuf::from("config.toml"),
    }
}
