//! Error types for commitbell-discord.

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to Discord.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The bot token was rejected.
    #[error("Discord login failed: invalid bot token - check DISCORD_BOT_TOKEN")]
    AuthenticationFailed,

    /// The bot lacks permission to post in the channel.
    #[error("permission error: cannot send messages to channel {channel_id} - check bot permissions")]
    PermissionDenied { channel_id: u64 },

    /// Channel does not exist or the bot is not in its server.
    #[error("channel {channel_id} not found - check DISCORD_CHANNEL_ID and that the bot is in the server")]
    ChannelNotFound { channel_id: u64 },

    /// Discord asked us to slow down.
    #[error("Discord rate limit hit{}", .retry_after.map(|s| format!(" - retry after {s:.1}s")).unwrap_or_default())]
    RateLimited { retry_after: Option<f64> },

    /// API error with status code.
    #[error("Discord API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    /// Request exceeded the configured timeout.
    #[error("request to Discord API timed out")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// JSON parsing error.
    #[error("failed to parse Discord response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl Error {
    /// Whether retrying can never succeed without operator intervention.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::AuthenticationFailed)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err)
        }
    }
}
