//! Mock implementations for testing the monitor.
//!
//! These mocks implement the API traits from commitbell-github and
//! commitbell-discord so the loop logic can be exercised without HTTP.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::DateTime;
use commitbell_discord::{self as discord, CurrentUser, DiscordApi, Embed, Message};
use commitbell_github::{self as github, CommitRecord, GitHubApi, Identity};

/// One scripted response from [`MockGitHub`].
#[derive(Debug, Clone, Copy)]
pub enum Fetch {
    Commit(&'static str),
    Empty,
    Timeout,
    NotFound,
    RateLimited(Option<i64>),
}

/// Mock implementation of `GitHubApi`.
///
/// Replays the script in order, then keeps repeating its last entry.
pub struct MockGitHub {
    script: Vec<Fetch>,
    calls: AtomicUsize,
}

impl MockGitHub {
    pub fn new(script: impl IntoIterator<Item = Fetch>) -> Self {
        Self {
            script: script.into_iter().collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub fn commit(sha: &str) -> CommitRecord {
    let identity = Identity {
        name: "Ada".into(),
        login: Some("ada".into()),
        html_url: Some("https://github.com/ada".into()),
        avatar_url: None,
    };
    CommitRecord {
        sha: sha.into(),
        message: format!("Commit {sha}"),
        html_url: format!("https://github.com/octocat/hello/commit/{sha}"),
        committed_at: "2024-05-01T10:05:00Z".into(),
        author: identity.clone(),
        committer: identity,
    }
}

impl GitHubApi for MockGitHub {
    async fn latest_commit(&self, owner: &str, repo: &str) -> github::Result<Option<CommitRecord>> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self
            .script
            .get(n)
            .or_else(|| self.script.last())
            .copied()
            .unwrap_or(Fetch::Empty);

        match step {
            Fetch::Commit(sha) => Ok(Some(commit(sha))),
            Fetch::Empty => Ok(None),
            Fetch::Timeout => Err(github::Error::Timeout),
            Fetch::NotFound => Err(github::Error::NotFound {
                owner: owner.to_string(),
                repo: repo.to_string(),
            }),
            Fetch::RateLimited(reset) => Err(github::Error::RateLimited {
                reset_at: reset.and_then(|secs| DateTime::from_timestamp(secs, 0)),
            }),
        }
    }
}

/// A failure [`MockDiscord`] should report instead of sending.
#[derive(Debug, Clone, Copy)]
pub enum SendFailure {
    Forbidden,
    UnknownChannel,
    Unauthorized,
}

/// Mock implementation of `DiscordApi` that records sent embeds.
#[derive(Default)]
pub struct MockDiscord {
    sent: Mutex<Vec<(u64, Embed)>>,
    failures: Mutex<VecDeque<SendFailure>>,
    attempts: AtomicUsize,
}

impl MockDiscord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a failure for the next send attempt.
    pub fn fail_next(self, failure: SendFailure) -> Self {
        self.failures.lock().unwrap().push_back(failure);
        self
    }

    /// Embeds that were delivered, with their channel.
    pub fn sent(&self) -> Vec<(u64, Embed)> {
        self.sent.lock().unwrap().clone()
    }

    /// Send attempts, including failed ones.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl DiscordApi for MockDiscord {
    async fn current_user(&self) -> discord::Result<CurrentUser> {
        Ok(CurrentUser {
            id: "777".into(),
            username: "commitbell".into(),
            bot: true,
        })
    }

    async fn send_embed(&self, channel_id: u64, embed: &Embed) -> discord::Result<Message> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        let failure = self.failures.lock().unwrap().pop_front();
        match failure {
            Some(SendFailure::Forbidden) => Err(discord::Error::PermissionDenied { channel_id }),
            Some(SendFailure::UnknownChannel) => Err(discord::Error::ChannelNotFound { channel_id }),
            Some(SendFailure::Unauthorized) => Err(discord::Error::AuthenticationFailed),
            None => {
                let mut sent = self.sent.lock().unwrap();
                sent.push((channel_id, embed.clone()));
                Ok(Message {
                    id: sent.len().to_string(),
                    channel_id: channel_id.to_string(),
                })
            }
        }
    }
}

/// In-memory sink for formatted log lines.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Install a plain-text subscriber writing here for the current thread.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let sink = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || sink.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
