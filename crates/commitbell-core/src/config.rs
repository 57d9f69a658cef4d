//! Configuration management for commitbell.
//!
//! Settings come from an optional TOML file, then environment variables
//! (the names the bot has always used), then command-line flags applied by
//! the caller. [`Config::validate`] turns the merged result into
//! [`Settings`] or a descriptive error naming what to set.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use commitbell_discord::DiscordClient;
use commitbell_github::{GitHubClient, RepoRef};
use secrecy::SecretString;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "commitbell.toml";

/// Environment variable names.
pub mod env {
    pub const DISCORD_BOT_TOKEN: &str = "DISCORD_BOT_TOKEN";
    pub const DISCORD_CHANNEL_ID: &str = "DISCORD_CHANNEL_ID";
    pub const GITHUB_USERNAME: &str = "GITHUB_USERNAME";
    pub const GITHUB_REPO_NAME: &str = "GITHUB_REPO_NAME";
    pub const GITHUB_TOKEN: &str = "GITHUB_TOKEN";
    pub const CHECK_INTERVAL_SECONDS: &str = "CHECK_INTERVAL_SECONDS";
}

/// commitbell configuration as loaded from disk and the environment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Repository to watch.
    #[serde(default)]
    pub github: GitHubConfig,

    /// Where to post notifications.
    #[serde(default)]
    pub discord: DiscordConfig,

    /// Loop timing.
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config from a TOML file.
    ///
    /// A missing file is not an error; defaults are returned so that a purely
    /// environment-driven deployment works.
    ///
    /// # Errors
    /// Returns error if file can't be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Override settings from the process environment.
    ///
    /// # Errors
    /// Returns error if a numeric variable can't be parsed.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|name| std::env::var(name).ok())
    }

    /// Override settings from a variable lookup. Empty values are ignored.
    ///
    /// # Errors
    /// Returns error if a numeric variable can't be parsed.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(env::DISCORD_BOT_TOKEN) {
            self.discord.bot_token = Some(v);
        }
        if let Some(v) = get(env::DISCORD_CHANNEL_ID) {
            self.discord.channel_id = Some(parse_number(env::DISCORD_CHANNEL_ID, &v)?);
        }
        if let Some(v) = get(env::GITHUB_USERNAME) {
            self.github.owner = Some(v);
        }
        if let Some(v) = get(env::GITHUB_REPO_NAME) {
            self.github.repo = Some(v);
        }
        if let Some(v) = get(env::GITHUB_TOKEN) {
            self.github.token = Some(v);
        }
        if let Some(v) = get(env::CHECK_INTERVAL_SECONDS) {
            self.monitor.interval_secs = parse_number(env::CHECK_INTERVAL_SECONDS, &v)?;
        }

        Ok(())
    }

    /// Check that everything the polling loop needs is present.
    ///
    /// # Errors
    /// Returns `MissingConfig` naming the first absent setting, or
    /// `InvalidConfig` for unusable values.
    pub fn validate(&self) -> Result<Settings> {
        let discord = self.validate_discord()?;
        let github = self.validate_github()?;

        if self.monitor.interval_secs == 0 {
            return Err(Error::InvalidConfig {
                name: env::CHECK_INTERVAL_SECONDS,
                reason: "interval must be at least one second".into(),
            });
        }

        Ok(Settings {
            github,
            discord,
            interval: Duration::from_secs(self.monitor.interval_secs),
        })
    }

    /// Check only the GitHub half of the configuration.
    ///
    /// # Errors
    /// Returns `MissingConfig` if the owner or repository is absent.
    pub fn validate_github(&self) -> Result<GitHubSettings> {
        let owner = required(self.github.owner.as_ref(), "github.owner", env::GITHUB_USERNAME)?;
        let repo = required(self.github.repo.as_ref(), "github.repo", env::GITHUB_REPO_NAME)?;

        Ok(GitHubSettings {
            repo: RepoRef::new(owner, repo),
            token: present(self.github.token.as_ref()).map(SecretString::from),
            api_url: self
                .github
                .api_url
                .clone()
                .unwrap_or_else(|| GitHubClient::DEFAULT_API_URL.to_string()),
            timeout: self.request_timeout()?,
        })
    }

    fn validate_discord(&self) -> Result<DiscordSettings> {
        let bot_token = required(
            self.discord.bot_token.as_ref(),
            "discord.bot_token",
            env::DISCORD_BOT_TOKEN,
        )?;
        let channel_id = self.discord.channel_id.ok_or(Error::MissingConfig {
            key: "discord.channel_id",
            env: env::DISCORD_CHANNEL_ID,
        })?;

        Ok(DiscordSettings {
            bot_token: SecretString::from(bot_token),
            channel_id,
            api_url: self
                .discord
                .api_url
                .clone()
                .unwrap_or_else(|| DiscordClient::DEFAULT_API_URL.to_string()),
            timeout: self.request_timeout()?,
        })
    }

    fn request_timeout(&self) -> Result<Duration> {
        if self.monitor.request_timeout_secs == 0 {
            return Err(Error::InvalidConfig {
                name: "monitor.request_timeout_secs",
                reason: "timeout must be at least one second".into(),
            });
        }
        Ok(Duration::from_secs(self.monitor.request_timeout_secs))
    }
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn required<'a>(
    value: Option<&'a String>,
    key: &'static str,
    env: &'static str,
) -> Result<&'a str> {
    present(value).ok_or(Error::MissingConfig { key, env })
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T>
where
    T::Err: fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| Error::InvalidConfig {
            name,
            reason: format!("'{value}' is not a valid number ({e})"),
        })
}

/// GitHub-specific settings.
#[derive(Clone, Default, Deserialize)]
pub struct GitHubConfig {
    /// Repository owner (user or organization).
    pub owner: Option<String>,

    /// Repository name.
    pub repo: Option<String>,

    /// Optional personal access token.
    pub token: Option<String>,

    /// Custom API URL for GitHub Enterprise.
    pub api_url: Option<String>,
}

impl fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("token", &self.token.as_ref().map(|_| "[redacted]"))
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// Discord-specific settings.
#[derive(Clone, Default, Deserialize)]
pub struct DiscordConfig {
    /// Bot token.
    pub bot_token: Option<String>,

    /// Text channel to post into.
    pub channel_id: Option<u64>,

    /// Custom API URL.
    pub api_url: Option<String>,
}

impl fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("bot_token", &self.bot_token.as_ref().map(|_| "[redacted]"))
            .field("channel_id", &self.channel_id)
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// Polling loop settings.
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    /// Seconds between checks.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Per-request timeout for both APIs.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

const fn default_interval_secs() -> u64 {
    300
}

const fn default_request_timeout_secs() -> u64 {
    10
}

/// Log output settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Plain-text log file, truncated on each start.
    #[serde(default = "default_log_file")]
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
        }
    }
}

fn default_log_file() -> PathBuf {
    PathBuf::from("commitbell.log")
}

/// Validated settings for running the monitor.
#[derive(Debug)]
pub struct Settings {
    pub github: GitHubSettings,
    pub discord: DiscordSettings,
    /// Time between ticks.
    pub interval: Duration,
}

/// Validated GitHub settings.
#[derive(Debug)]
pub struct GitHubSettings {
    pub repo: RepoRef,
    pub token: Option<SecretString>,
    pub api_url: String,
    pub timeout: Duration,
}

/// Validated Discord settings.
#[derive(Debug)]
pub struct DiscordSettings {
    pub bot_token: SecretString,
    pub channel_id: u64,
    pub api_url: String,
    pub timeout: Duration,
}
