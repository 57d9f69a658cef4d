//! Command definitions and shared helpers.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commitbell_core::Config;
use commitbell_core::config::DEFAULT_CONFIG_FILE;

pub mod check;
pub mod run;

/// Announce new GitHub commits in a Discord channel.
#[derive(Debug, Parser)]
#[command(name = "commitbell", version, about)]
pub struct Cli {
    /// Path to the TOML config file (optional; environment variables also work).
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Watch the repository and post new commits (default).
    Run {
        /// Seconds between checks; overrides CHECK_INTERVAL_SECONDS.
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Fetch the latest commit once and print it, without notifying.
    Check,
}

/// Load the config file and apply environment overrides.
pub fn load_config(path: &Path) -> Result<Config> {
    let mut config = Config::load(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;
    config.apply_env()?;
    Ok(config)
}
