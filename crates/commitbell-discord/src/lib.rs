//! # commitbell-discord
//!
//! Discord REST API integration for commitbell: posting embeds to a text
//! channel with a bot token, and verifying that token at startup.
//!
//! Only the HTTP API is used; no gateway connection is opened.

mod client;
mod error;
mod traits;
mod types;

pub use client::DiscordClient;
pub use error::{Error, Result};
pub use traits::DiscordApi;
pub use secrecy::SecretString;
pub use types::{CurrentUser, Embed, EmbedField, EmbedFooter, EmbedThumbnail, Message};
