//! `commitbell check` command - Show the latest commit without notifying.

use std::path::Path;

use anyhow::{Context, Result};
use commitbell_github::{Auth, GitHubClient};

use crate::commands;
use crate::logging;
use crate::output;

/// Fetch and print the newest commit of the configured repository.
pub fn run(config_path: &Path, verbose: bool) -> Result<()> {
    let config = commands::load_config(config_path)?;
    logging::init(None, verbose)?;
    let settings = config.validate_github()?;
    let repo = settings.repo;

    let client = GitHubClient::with_timeout(
        &Auth::from_token(settings.token),
        settings.api_url,
        settings.timeout,
    )
    .context("Failed to create GitHub client")?;

    let rt = tokio::runtime::Runtime::new()?;
    let latest = rt
        .block_on(client.latest_commit(&repo.owner, &repo.name))
        .with_context(|| format!("Failed to fetch the latest commit of {repo}"))?;

    let Some(commit) = latest else {
        output::warn(&format!("{repo} has no commits yet"));
        return Ok(());
    };

    output::success(&format!("Latest commit on {repo}"));
    output::detail(&format!("  {} {}", commit.short_sha(), commit.subject()));
    output::detail(&format!(
        "  by {}{}",
        commit.author.name,
        commit
            .author
            .login
            .as_deref()
            .map(|login| format!(" (@{login})"))
            .unwrap_or_default()
    ));
    if !commit.committed_at.is_empty() {
        output::detail(&format!("  at {}", commit.committed_at));
    }
    output::essential(&commit.html_url);

    Ok(())
}
