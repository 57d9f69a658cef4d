//! `commitbell run` command - Poll the repository and notify Discord.

use std::path::Path;

use anyhow::{Context, Result};
use commitbell_core::{Monitor, Settings, schedule};
use commitbell_discord::DiscordClient;
use commitbell_github::{Auth, GitHubClient};
use tracing::{info, warn};

use crate::commands;
use crate::logging;

/// Run the polling loop until Ctrl-C or a fatal error.
pub fn run(config_path: &Path, interval: Option<u64>, verbose: bool) -> Result<()> {
    let mut config = commands::load_config(config_path)?;
    if let Some(secs) = interval {
        config.monitor.interval_secs = secs;
    }

    logging::init(Some(&config.logging.file), verbose)?;
    let settings = config.validate()?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(watch(settings))
}

async fn watch(settings: Settings) -> Result<()> {
    let Settings {
        github,
        discord,
        interval,
    } = settings;

    let discord_client =
        DiscordClient::with_base_url(discord.bot_token, discord.api_url, discord.timeout)
            .context("Failed to create Discord client")?;

    match discord_client.current_user().await {
        Ok(user) => info!("Logged in as {} (ID: {})", user.username, user.id),
        Err(e) if e.is_fatal() => {
            return Err(anyhow::Error::from(e).context("Could not log in to Discord"));
        }
        Err(e) => warn!(error = %e, "Could not verify Discord bot token, continuing"),
    }

    let github_client = GitHubClient::with_timeout(
        &Auth::from_token(github.token),
        github.api_url,
        github.timeout,
    )
    .context("Failed to create GitHub client")?;

    info!("Monitoring GitHub Repo: {}", github.repo);
    info!("Notifications will be sent to Channel ID: {}", discord.channel_id);
    info!("Check interval: {} seconds", interval.as_secs());

    let mut monitor = Monitor::new(
        &github_client,
        &discord_client,
        github.repo,
        discord.channel_id,
    );

    schedule::run(&mut monitor, interval, shutdown_signal()).await?;
    Ok(())
}

/// Resolve on Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl-C");
}
