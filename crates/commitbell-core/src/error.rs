//! Error types for commitbell-core.

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in commitbell-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required setting was not provided.
    #[error("missing required configuration: set {env} (or `{key}` in the config file)")]
    MissingConfig {
        /// Config file key, e.g. `discord.bot_token`.
        key: &'static str,
        /// Environment variable, e.g. `DISCORD_BOT_TOKEN`.
        env: &'static str,
    },

    /// A setting was present but unusable.
    #[error("invalid configuration for {name}: {reason}")]
    InvalidConfig { name: &'static str, reason: String },

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error.
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Discord API error.
    #[error("discord error: {0}")]
    Discord(#[from] commitbell_discord::Error),
}
