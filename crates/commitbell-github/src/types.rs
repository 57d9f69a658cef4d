//! GitHub API types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An `owner/repo` pair identifying a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    /// Account or organization that owns the repository.
    pub owner: String,

    /// Repository name.
    pub name: String,
}

impl RepoRef {
    /// Create a new repository reference.
    #[must_use]
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// The newest commit of a repository, as returned by the commits endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Full commit SHA.
    pub sha: String,

    /// Full commit message.
    pub message: String,

    /// Commit page URL.
    pub html_url: String,

    /// Committer date as reported by GitHub (ISO-8601).
    pub committed_at: String,

    /// Who wrote the change.
    pub author: Identity,

    /// Who committed the change.
    pub committer: Identity,
}

impl CommitRecord {
    /// First seven characters of the SHA.
    #[must_use]
    pub fn short_sha(&self) -> &str {
        self.sha.get(..7).unwrap_or(&self.sha)
    }

    /// First line of the commit message.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }
}

/// A git identity, optionally linked to a GitHub account.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Identity {
    /// Name recorded in the git commit.
    pub name: String,

    /// GitHub login, when the email maps to an account.
    pub login: Option<String>,

    /// GitHub profile URL.
    pub html_url: Option<String>,

    /// Avatar image URL.
    pub avatar_url: Option<String>,
}
