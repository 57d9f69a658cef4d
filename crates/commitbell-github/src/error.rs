//! Error types for commitbell-github.

use chrono::{DateTime, Utc};

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while fetching commits from GitHub.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The token was rejected.
    #[error("GitHub authentication failed - check GITHUB_TOKEN")]
    AuthenticationFailed,

    /// API rate limit exceeded.
    #[error("GitHub API rate limit exceeded{}", reset_suffix(.reset_at.as_ref()))]
    RateLimited {
        /// When the quota resets, if GitHub reported it.
        reset_at: Option<DateTime<Utc>>,
    },

    /// Repository not found or no access.
    #[error("repository {owner}/{repo} not found - check GITHUB_USERNAME and GITHUB_REPO_NAME")]
    NotFound { owner: String, repo: String },

    /// API error with status code.
    #[error("GitHub API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    /// Request exceeded the configured timeout.
    #[error("request to GitHub API timed out")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// JSON parsing error.
    #[error("failed to parse GitHub response: {0}")]
    Parse(#[from] serde_json::Error),
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

fn reset_suffix(reset_at: Option<&DateTime<Utc>>) -> String {
    reset_at.map_or_else(String::new, |at| {
        format!(" - resets at {}", at.format("%Y-%m-%d %H:%M:%S UTC"))
    })
}
