//! Commit change detection.
//!
//! [`Monitor`] owns the last-known commit and runs one check per call to
//! [`Monitor::tick`]. The last-known SHA only moves forward after Discord
//! accepted the notification, so a failed send is retried on the next tick.

use commitbell_discord::{self as discord, DiscordApi};
use commitbell_github::{self as github, CommitRecord, GitHubApi, RepoRef};
use tracing::{error, info, warn};

use crate::error::Result;
use crate::render::render_commit;

/// Where the monitor stands with respect to the repository history.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MonitorState {
    /// No commit has been fetched successfully yet.
    #[default]
    Uninitialized,
    /// Holds the commit seen at startup; nothing notified yet.
    Baseline(String),
    /// Holds the last commit a notification was delivered for.
    Steady(String),
}

impl MonitorState {
    /// The last-known commit SHA, if any.
    #[must_use]
    pub fn last_known(&self) -> Option<&str> {
        match self {
            Self::Uninitialized => None,
            Self::Baseline(sha) | Self::Steady(sha) => Some(sha),
        }
    }
}

/// What a single check did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// First successful fetch; recorded without notifying.
    BaselineSet { sha: String },
    /// Latest commit is the one already known.
    NoChange,
    /// A new commit was announced.
    Notified { sha: String },
    /// A new commit was found but the notification failed; will retry.
    SendFailed { sha: String },
    /// The fetch failed; will retry.
    FetchFailed,
    /// The repository has no commits.
    EmptyRepository,
}

/// Polls one repository and notifies one channel.
pub struct Monitor<'a, G: GitHubApi, D: DiscordApi> {
    github: &'a G,
    discord: &'a D,
    repo: RepoRef,
    channel_id: u64,
    state: MonitorState,
}

impl<'a, G: GitHubApi, D: DiscordApi> Monitor<'a, G, D> {
    /// Create a monitor with no known commit.
    #[must_use]
    pub fn new(github: &'a G, discord: &'a D, repo: RepoRef, channel_id: u64) -> Self {
        Self {
            github,
            discord,
            repo,
            channel_id,
            state: MonitorState::Uninitialized,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &MonitorState {
        &self.state
    }

    /// Repository being watched.
    #[must_use]
    pub const fn repo(&self) -> &RepoRef {
        &self.repo
    }

    /// Record the current head without notifying.
    ///
    /// Run once before the timer starts so existing history is never
    /// announced. On failure the monitor stays uninitialized and the first
    /// successful tick takes the baseline instead.
    pub async fn baseline(&mut self) -> TickOutcome {
        info!("Performing initial commit check to set baseline...");
        match self.fetch().await {
            Ok(commit) => self.set_baseline(commit.sha),
            Err(outcome) => {
                warn!("Could not fetch initial commit to set baseline. Will retry on next loop interval.");
                outcome
            }
        }
    }

    /// Run one check.
    ///
    /// Fetch and send failures are logged and reported through the outcome.
    ///
    /// # Errors
    /// Returns error only if Discord rejected the bot credential, which no
    /// amount of retrying will fix.
    pub async fn tick(&mut self) -> Result<TickOutcome> {
        info!("Checking for new commits...");

        let commit = match self.fetch().await {
            Ok(commit) => commit,
            Err(outcome) => return Ok(outcome),
        };

        match self.state.last_known() {
            None => return Ok(self.set_baseline(commit.sha)),
            Some(last) if last == commit.sha => {
                info!("No new commits found.");
                return Ok(TickOutcome::NoChange);
            }
            Some(_) => {}
        }

        info!(sha = %commit.sha, "New commit detected! SHA: {}", commit.short_sha());
        self.notify(commit).await
    }

    async fn notify(&mut self, commit: CommitRecord) -> Result<TickOutcome> {
        let embed = render_commit(&self.repo, &commit);

        match self.discord.send_embed(self.channel_id, &embed).await {
            Ok(_) => {
                info!(
                    "Notification sent to channel {} for commit {}",
                    self.channel_id,
                    commit.short_sha()
                );
                self.state = MonitorState::Steady(commit.sha.clone());
                Ok(TickOutcome::Notified { sha: commit.sha })
            }
            Err(e) if e.is_fatal() => {
                error!(error = %e, "Discord rejected the bot token");
                Err(e.into())
            }
            Err(e) => {
                log_send_error(&e);
                Ok(TickOutcome::SendFailed { sha: commit.sha })
            }
        }
    }

    /// Fetch the latest commit, mapping the non-commit results to outcomes.
    async fn fetch(&self) -> std::result::Result<CommitRecord, TickOutcome> {
        match self
            .github
            .latest_commit(&self.repo.owner, &self.repo.name)
            .await
        {
            Ok(Some(commit)) => Ok(commit),
            Ok(None) => {
                warn!(
                    "No commits found for {}. Is the repository empty or name correct?",
                    self.repo
                );
                Err(TickOutcome::EmptyRepository)
            }
            Err(e) => {
                log_fetch_error(&e);
                Err(TickOutcome::FetchFailed)
            }
        }
    }

    fn set_baseline(&mut self, sha: String) -> TickOutcome {
        info!(
            "Baseline commit SHA set to: {}",
            sha.get(..7).unwrap_or(&sha)
        );
        self.state = MonitorState::Baseline(sha.clone());
        TickOutcome::BaselineSet { sha }
    }
}

fn log_fetch_error(err: &github::Error) {
    match err {
        github::Error::Timeout => error!("Request to GitHub API timed out."),
        github::Error::NotFound { owner, repo } => {
            error!("Repository {owner}/{repo} not found. Check GITHUB_USERNAME and GITHUB_REPO_NAME.");
        }
        github::Error::RateLimited {
            reset_at: Some(reset_at),
        } => error!(
            %reset_at,
            "GitHub API rate limit exceeded. Resets at: {}",
            reset_at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        github::Error::RateLimited { reset_at: None } => {
            error!("GitHub API rate limit exceeded.");
        }
        github::Error::AuthenticationFailed => {
            error!("GitHub rejected the token (401). Check GITHUB_TOKEN.");
        }
        github::Error::ApiError { status: 403, .. } => {
            error!("Access forbidden (403). Check GITHUB_TOKEN permissions or API rate limits.");
        }
        other => error!(error = %other, "Error fetching GitHub data"),
    }
}

fn log_send_error(err: &discord::Error) {
    match err {
        discord::Error::PermissionDenied { channel_id } => error!(
            "Permission error: Cannot send messages to channel {channel_id}. Check bot permissions."
        ),
        discord::Error::ChannelNotFound { channel_id } => {
            error!("Channel {channel_id} not found. Check DISCORD_CHANNEL_ID.");
        }
        other => error!(error = %other, "Failed to send Discord message"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::test_mocks::{Fetch, LogCapture, MockDiscord, MockGitHub, SendFailure};

    const A: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const B: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

    fn repo() -> RepoRef {
        RepoRef::new("octocat", "hello")
    }

    #[tokio::test]
    async fn test_first_fetch_sets_baseline_without_notifying() {
        let github = MockGitHub::new([Fetch::Commit(A)]);
        let discord = MockDiscord::new();
        let mut monitor = Monitor::new(&github, &discord, repo(), 42);

        let outcome = monitor.baseline().await;

        assert_eq!(outcome, TickOutcome::BaselineSet { sha: A.into() });
        assert_eq!(monitor.state(), &MonitorState::Baseline(A.into()));
        assert_eq!(monitor.state().last_known(), Some(A));
        assert!(discord.sent().is_empty());
    }

    #[tokio::test]
    async fn test_unchanged_commit_is_noop() {
        let github = MockGitHub::new([Fetch::Commit(A)]);
        let discord = MockDiscord::new();
        let mut monitor = Monitor::new(&github, &discord, repo(), 42);
        monitor.baseline().await;

        for _ in 0..3 {
            assert_eq!(monitor.tick().await.unwrap(), TickOutcome::NoChange);
        }

        assert_eq!(monitor.state().last_known(), Some(A));
        assert!(discord.sent().is_empty());
        assert_eq!(github.calls(), 4);
    }

    #[tokio::test]
    async fn test_new_commit_notifies_once() {
        let github = MockGitHub::new([Fetch::Commit(A), Fetch::Commit(B)]);
        let discord = MockDiscord::new();
        let mut monitor = Monitor::new(&github, &discord, repo(), 42);
        monitor.baseline().await;

        let outcome = monitor.tick().await.unwrap();

        assert_eq!(outcome, TickOutcome::Notified { sha: B.into() });
        assert_eq!(monitor.state(), &MonitorState::Steady(B.into()));

        let sent = discord.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, 42);
        assert!(sent[0].1.field("Commit Hash").unwrap().value.contains("bbbbbbb"));

        // Still B on the next tick: nothing more is sent.
        assert_eq!(monitor.tick().await.unwrap(), TickOutcome::NoChange);
        assert_eq!(discord.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_send_keeps_last_known_and_retries() {
        let github = MockGitHub::new([Fetch::Commit(A), Fetch::Commit(B)]);
        let discord = MockDiscord::new().fail_next(SendFailure::Forbidden);
        let mut monitor = Monitor::new(&github, &discord, repo(), 42);
        monitor.baseline().await;

        let outcome = monitor.tick().await.unwrap();
        assert_eq!(outcome, TickOutcome::SendFailed { sha: B.into() });
        assert_eq!(monitor.state(), &MonitorState::Baseline(A.into()));
        assert!(discord.sent().is_empty());

        let outcome = monitor.tick().await.unwrap();
        assert_eq!(outcome, TickOutcome::Notified { sha: B.into() });
        assert_eq!(monitor.state().last_known(), Some(B));
        assert_eq!(discord.sent().len(), 1);
        assert_eq!(discord.attempts(), 2);
    }

    #[tokio::test]
    async fn test_channel_not_found_is_not_fatal() {
        let github = MockGitHub::new([Fetch::Commit(A), Fetch::Commit(B)]);
        let discord = MockDiscord::new().fail_next(SendFailure::UnknownChannel);
        let mut monitor = Monitor::new(&github, &discord, repo(), 42);
        monitor.baseline().await;

        assert_eq!(
            monitor.tick().await.unwrap(),
            TickOutcome::SendFailed { sha: B.into() }
        );
    }

    #[tokio::test]
    async fn test_rejected_bot_token_is_fatal() {
        let github = MockGitHub::new([Fetch::Commit(A), Fetch::Commit(B)]);
        let discord = MockDiscord::new().fail_next(SendFailure::Unauthorized);
        let mut monitor = Monitor::new(&github, &discord, repo(), 42);
        monitor.baseline().await;

        let result = monitor.tick().await;

        assert!(matches!(
            result,
            Err(Error::Discord(commitbell_discord::Error::AuthenticationFailed))
        ));
        assert_eq!(monitor.state().last_known(), Some(A));
    }

    #[tokio::test]
    async fn test_scenario_single_commit_then_new_head() {
        let github = MockGitHub::new([Fetch::Commit(A), Fetch::Commit(A), Fetch::Commit(B)]);
        let discord = MockDiscord::new();
        let mut monitor = Monitor::new(&github, &discord, repo(), 42);

        assert_eq!(
            monitor.baseline().await,
            TickOutcome::BaselineSet { sha: A.into() }
        );
        assert_eq!(monitor.tick().await.unwrap(), TickOutcome::NoChange);
        assert_eq!(
            monitor.tick().await.unwrap(),
            TickOutcome::Notified { sha: B.into() }
        );

        assert_eq!(discord.sent().len(), 1);
        assert_eq!(monitor.state().last_known(), Some(B));
    }

    #[tokio::test]
    async fn test_empty_repository_leaves_state_unset() {
        let github = MockGitHub::new([Fetch::Empty]);
        let discord = MockDiscord::new();
        let mut monitor = Monitor::new(&github, &discord, repo(), 42);

        assert_eq!(monitor.baseline().await, TickOutcome::EmptyRepository);
        assert_eq!(monitor.tick().await.unwrap(), TickOutcome::EmptyRepository);

        assert_eq!(monitor.state(), &MonitorState::Uninitialized);
        assert!(discord.sent().is_empty());
    }

    #[tokio::test]
    async fn test_rate_limited_fetch_keeps_state() {
        let github = MockGitHub::new([
            Fetch::Commit(A),
            Fetch::RateLimited(Some(1_700_000_000)),
            Fetch::Commit(A),
        ]);
        let discord = MockDiscord::new();
        let mut monitor = Monitor::new(&github, &discord, repo(), 42);
        monitor.baseline().await;

        assert_eq!(monitor.tick().await.unwrap(), TickOutcome::FetchFailed);
        assert_eq!(monitor.state().last_known(), Some(A));
        assert_eq!(monitor.tick().await.unwrap(), TickOutcome::NoChange);
        assert!(discord.sent().is_empty());
    }

    #[tokio::test]
    async fn test_rate_limited_fetch_logs_reset_time() {
        let logs = LogCapture::default();
        let _guard = logs.install();

        let github = MockGitHub::new([Fetch::Commit(A), Fetch::RateLimited(Some(1_700_000_000))]);
        let discord = MockDiscord::new();
        let mut monitor = Monitor::new(&github, &discord, repo(), 42);
        monitor.baseline().await;

        assert_eq!(monitor.tick().await.unwrap(), TickOutcome::FetchFailed);

        let output = logs.contents();
        assert!(output.contains("GitHub API rate limit exceeded."));
        assert!(output.contains("Resets at: 2023-11-14 22:13:20 UTC"), "{output}");
    }

    #[tokio::test]
    async fn test_empty_repository_is_logged() {
        let logs = LogCapture::default();
        let _guard = logs.install();

        let github = MockGitHub::new([Fetch::Commit(A), Fetch::Empty]);
        let discord = MockDiscord::new();
        let mut monitor = Monitor::new(&github, &discord, repo(), 42);
        monitor.baseline().await;

        assert_eq!(monitor.tick().await.unwrap(), TickOutcome::EmptyRepository);
        assert_eq!(monitor.state(), &MonitorState::Baseline(A.into()));
        assert!(discord.sent().is_empty());

        let output = logs.contents();
        assert!(
            output.contains("No commits found for octocat/hello."),
            "{output}"
        );
        assert!(output.contains("WARN"));
    }

    #[tokio::test]
    async fn test_failed_baseline_is_taken_by_first_tick() {
        let github = MockGitHub::new([Fetch::Timeout, Fetch::Commit(A), Fetch::Commit(B)]);
        let discord = MockDiscord::new();
        let mut monitor = Monitor::new(&github, &discord, repo(), 42);

        assert_eq!(monitor.baseline().await, TickOutcome::FetchFailed);
        assert_eq!(monitor.state(), &MonitorState::Uninitialized);

        assert_eq!(
            monitor.tick().await.unwrap(),
            TickOutcome::BaselineSet { sha: A.into() }
        );
        assert!(discord.sent().is_empty());

        assert_eq!(
            monitor.tick().await.unwrap(),
            TickOutcome::Notified { sha: B.into() }
        );
    }

    #[tokio::test]
    async fn test_not_found_fetch_is_logged_and_skipped() {
        let github = MockGitHub::new([Fetch::Commit(A), Fetch::NotFound]);
        let discord = MockDiscord::new();
        let mut monitor = Monitor::new(&github, &discord, repo(), 42);
        monitor.baseline().await;

        assert_eq!(monitor.tick().await.unwrap(), TickOutcome::FetchFailed);
        assert_eq!(monitor.state(), &MonitorState::Baseline(A.into()));
    }
}
