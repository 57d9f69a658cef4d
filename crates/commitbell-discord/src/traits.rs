//! Trait abstraction for Discord API operations.

use crate::{CurrentUser, Embed, Message, Result};

/// Trait for Discord API operations.
///
/// Lets the commit monitor post notifications without depending on a live
/// Discord connection, so tests can substitute a recording mock.
pub trait DiscordApi: Send + Sync {
    /// Fetch the bot account the token belongs to.
    fn current_user(&self) -> impl std::future::Future<Output = Result<CurrentUser>> + Send;

    /// Post a single embed to a text channel.
    fn send_embed(
        &self,
        channel_id: u64,
        embed: &Embed,
    ) -> impl std::future::Future<Output = Result<Message>> + Send;
}
