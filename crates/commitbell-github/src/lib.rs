//! # commitbell-github
//!
//! GitHub API integration for commitbell, providing lookup of the newest
//! commit on a repository's default branch.
//!
//! # Security
//!
//! Authentication tokens are stored using `SecretString` which automatically
//! zeroizes memory when dropped, reducing credential exposure in memory dumps.

mod auth;
mod client;
mod error;
mod traits;
mod types;

pub use auth::Auth;
pub use client::GitHubClient;
pub use error::{Error, Result};
pub use traits::GitHubApi;
// Re-export SecretString for constructing Auth::Token
pub use secrecy::SecretString;
pub use types::{CommitRecord, Identity, RepoRef};
