//! Trait abstractions for GitHub API operations.
//!
//! This module defines the `GitHubApi` trait which abstracts GitHub API operations,
//! enabling dependency injection and testability.

use crate::{CommitRecord, Result};

/// Trait for GitHub API operations.
///
/// This trait abstracts GitHub API calls, allowing for:
/// - Dependency injection into the commit monitor
/// - Mock implementations for testing
///
/// Methods take `owner` and `repo` as parameters so one client can serve
/// any repository.
pub trait GitHubApi: Send + Sync {
    /// Fetch the newest commit of a repository.
    ///
    /// Returns `None` if the repository has no commits yet.
    fn latest_commit(
        &self,
        owner: &str,
        repo: &str,
    ) -> impl std::future::Future<Output = Result<Option<CommitRecord>>> + Send;
}
