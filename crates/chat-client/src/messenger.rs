//! Messaging capability consumed by the bot core.

use crate::error::MessengerError;
use crate::types::{ChannelId, Content, MessageRef, UserId};
use async_trait::async_trait;

/// Operations the bot needs from the chat platform.
///
/// `NotFound` and `Forbidden` are returned as errors rather than panicking or
/// retrying so callers can decide whether to recover locally.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Post a new message and return its platform-assigned reference.
    async fn send_message(
        &self,
        channel: &ChannelId,
        content: &Content,
    ) -> Result<MessageRef, MessengerError>;

    /// Replace the body of an existing message.
    async fn edit_message(&self, message: &MessageRef, content: &Content)
        -> Result<(), MessengerError>;

    async fn delete_message(&self, message: &MessageRef) -> Result<(), MessengerError>;

    /// Add a reaction as the bot user.
    async fn add_reaction(&self, message: &MessageRef, emoji: &str) -> Result<(), MessengerError>;

    /// Remove every reaction from a message.
    async fn clear_reactions(&self, message: &MessageRef) -> Result<(), MessengerError>;

    /// Remove a single user's reaction.
    async fn remove_reaction(
        &self,
        message: &MessageRef,
        emoji: &str,
        user: &UserId,
    ) -> Result<(), MessengerError>;
}
