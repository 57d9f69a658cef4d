//! GitHub API client.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use crate::auth::Auth;
use crate::error::{Error, Result};
use crate::traits::GitHubApi;
use crate::types::{CommitRecord, Identity};

// === Internal API response types ===

/// Internal representation of an entry from `GET /repos/{owner}/{repo}/commits`.
#[derive(serde::Deserialize)]
struct ApiCommit {
    sha: String,
    html_url: String,
    commit: ApiCommitDetail,
    /// GitHub account of the author; `null` when the email is not linked.
    author: Option<ApiUser>,
    /// GitHub account of the committer; `null` when the email is not linked.
    committer: Option<ApiUser>,
}

#[derive(serde::Deserialize)]
struct ApiCommitDetail {
    message: String,
    author: ApiGitIdentity,
    committer: ApiGitIdentity,
}

/// Identity as recorded in the git object itself.
#[derive(serde::Deserialize)]
struct ApiGitIdentity {
    #[serde(default)]
    name: String,
    #[serde(default)]
    date: String,
}

#[derive(serde::Deserialize)]
struct ApiUser {
    login: String,
    html_url: Option<String>,
    avatar_url: Option<String>,
}

impl ApiCommit {
    /// Convert API response to domain type.
    fn into_record(self) -> CommitRecord {
        CommitRecord {
            sha: self.sha,
            message: self.commit.message,
            html_url: self.html_url,
            committed_at: self.commit.committer.date,
            author: identity(self.commit.author.name, self.author),
            committer: identity(self.commit.committer.name, self.committer),
        }
    }
}

fn identity(name: String, user: Option<ApiUser>) -> Identity {
    match user {
        Some(user) => Identity {
            name,
            login: Some(user.login),
            html_url: user.html_url,
            avatar_url: user.avatar_url,
        },
        None => Identity {
            name,
            ..Identity::default()
        },
    }
}

/// GitHub API client.
pub struct GitHubClient {
    client: Client,
    base_url: String,
    /// Token stored as `SecretString` for automatic zeroization on drop.
    token: Option<SecretString>,
}

impl GitHubClient {
    /// Default GitHub API URL.
    pub const DEFAULT_API_URL: &'static str = "https://api.github.com";

    /// Default per-request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Create a GitHub client for `base_url` (GitHub Enterprise or a test
    /// server) with the given request timeout.
    ///
    /// # Errors
    /// Returns error if the HTTP client can't be built.
    pub fn with_timeout(
        auth: &Auth,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let token = auth.resolve();

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("commitbell"));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        let base_url: String = base_url.into();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Make a GET request.
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token.expose_secret()));
        }

        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Handle API response.
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            let body = response.bytes().await?;
            return Ok(serde_json::from_slice(&body)?);
        }

        // Handle error responses
        let status_code = status.as_u16();

        match status_code {
            401 => Err(Error::AuthenticationFailed),
            429 => Err(Error::RateLimited {
                reset_at: rate_limit_reset(response.headers()),
            }),
            403 if response
                .headers()
                .get("x-ratelimit-remaining")
                .is_some_and(|v| v == "0") =>
            {
                Err(Error::RateLimited {
                    reset_at: rate_limit_reset(response.headers()),
                })
            }
            _ => {
                let text = response.text().await.unwrap_or_default();
                Err(Error::ApiError {
                    status: status_code,
                    message: text,
                })
            }
        }
    }

    // === Commit Operations ===

    /// Fetch the newest commit of a repository.
    ///
    /// Returns `None` when the repository has no commits.
    ///
    /// # Errors
    /// Returns error if the repository doesn't exist, the rate limit is
    /// exhausted, or the request fails.
    pub async fn latest_commit(&self, owner: &str, repo: &str) -> Result<Option<CommitRecord>> {
        let result: Result<Vec<ApiCommit>> = self
            .get(&format!("/repos/{owner}/{repo}/commits?per_page=1"))
            .await;

        match result {
            Ok(commits) => Ok(commits.into_iter().next().map(ApiCommit::into_record)),
            // GitHub answers 409 "Git Repository is empty." for repos without commits
            Err(Error::ApiError { status: 409, .. }) => Ok(None),
            Err(Error::ApiError { status: 404, .. }) => Err(Error::NotFound {
                owner: owner.to_string(),
                repo: repo.to_string(),
            }),
            Err(e) => Err(e),
        }
    }
}

/// Parse `x-ratelimit-reset` (epoch seconds) into a timestamp.
fn rate_limit_reset(headers: &HeaderMap) -> Option<DateTime<Utc>> {
    headers
        .get("x-ratelimit-reset")?
        .to_str()
        .ok()?
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "[redacted]"))
            .finish_non_exhaustive()
    }
}

// === Trait Implementation ===

impl GitHubApi for GitHubClient {
    async fn latest_commit(&self, owner: &str, repo: &str) -> Result<Option<CommitRecord>> {
        self.latest_commit(owner, repo).await
    }
}
