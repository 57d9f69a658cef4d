//! Fixed-interval driver for [`Monitor`].
//!
//! Ticks run strictly one after another: a slow tick pushes the next one
//! back instead of overlapping it.

use std::future::Future;
use std::time::Duration;

use commitbell_discord::DiscordApi;
use commitbell_github::GitHubApi;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::error::Result;
use crate::monitor::Monitor;

/// Take the baseline, then tick every `interval` until `shutdown` resolves.
///
/// The first tick fires one full interval after the baseline.
///
/// # Errors
/// Returns error if a tick hits a fatal error (rejected bot token).
pub async fn run<G, D, F>(
    monitor: &mut Monitor<'_, G, D>,
    interval: Duration,
    shutdown: F,
) -> Result<()>
where
    G: GitHubApi,
    D: DiscordApi,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    info!(
        repo = %monitor.repo(),
        interval_secs = interval.as_secs(),
        "Starting commit check loop"
    );

    tokio::select! {
        () = &mut shutdown => {
            info!("Shutdown requested before baseline");
            return Ok(());
        }
        outcome = monitor.baseline() => debug!(?outcome, "Baseline finished"),
    }

    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            () = &mut shutdown => break,
            _ = ticker.tick() => {}
        }

        tokio::select! {
            () = &mut shutdown => break,
            result = monitor.tick() => {
                let outcome = result?;
                debug!(?outcome, "Tick finished");
            }
        }
    }

    info!("Shutting down commit check loop");
    Ok(())
}
