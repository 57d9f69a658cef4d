//! # commitbell-core
//!
//! Core library for commitbell: configuration loading, rendering commits
//! into Discord embeds, and the poll/compare/notify state machine with the
//! scheduler that drives it.

pub mod config;
pub mod error;
pub mod monitor;
pub mod render;
pub mod schedule;

#[cfg(test)]
mod test_mocks;

pub use config::{Config, DiscordSettings, GitHubSettings, Settings};
pub use error::{Error, Result};
pub use monitor::{Monitor, MonitorState, TickOutcome};
pub use render::render_commit;
