//! Turning a commit into a Discord embed.

use chrono::{DateTime, Utc};
use commitbell_discord::{Embed, EmbedFooter, EmbedThumbnail};
use commitbell_github::{CommitRecord, Identity, RepoRef};

/// Longest commit message shown before truncation, in characters.
pub const MAX_MESSAGE_CHARS: usize = 1000;

/// Appended to truncated messages.
pub const ELLIPSIS: &str = "...";

/// Embed accent color (green).
pub const EMBED_COLOR: u32 = 0x2E_CC71;

/// Placeholder for identities without a GitHub account.
const NO_LOGIN: &str = "N/A";

/// Build the notification embed for a newly detected commit.
#[must_use]
pub fn render_commit(repo: &RepoRef, commit: &CommitRecord) -> Embed {
    let mut embed = Embed {
        title: format!("🚀 New Commit Pushed to `{}`", repo.name),
        description: Some(truncate_message(&commit.message)),
        url: Some(commit.html_url.clone()),
        color: Some(EMBED_COLOR),
        timestamp: parse_timestamp(&commit.committed_at),
        thumbnail: commit
            .committer
            .avatar_url
            .clone()
            .map(|url| EmbedThumbnail { url }),
        fields: Vec::new(),
        footer: Some(EmbedFooter {
            text: format!("Repository: {repo}"),
        }),
    };

    let committer = display_identity(&commit.committer);
    let committer = match &commit.committer.html_url {
        Some(url) => format!("[{committer}]({url})"),
        None => committer,
    };
    embed.add_field("Committer", committer, true);

    if !same_identity(&commit.author, &commit.committer) {
        embed.add_field("Author", display_identity(&commit.author), true);
    }

    embed.add_field(
        "Commit Hash",
        format!("[`{}`]({})", commit.short_sha(), commit.html_url),
        false,
    );

    embed
}

/// Cut a message to [`MAX_MESSAGE_CHARS`] characters, marking the cut.
#[must_use]
pub fn truncate_message(message: &str) -> String {
    match message.char_indices().nth(MAX_MESSAGE_CHARS) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &message[..cut]),
        None => message.to_string(),
    }
}

/// Parse GitHub's ISO-8601 commit date.
#[must_use]
pub fn parse_timestamp(date: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(date)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn display_identity(identity: &Identity) -> String {
    format!(
        "{} ({})",
        identity.name,
        identity.login.as_deref().unwrap_or(NO_LOGIN)
    )
}

/// Author and committer match when both name and login agree.
fn same_identity(a: &Identity, b: &Identity) -> bool {
    a.name == b.name && a.login == b.login
}
