//! Bot command handlers.

mod help;
mod search;

pub use help::HelpHandler;
pub use search::SearchHandler;

use crate::error::AppResult;
use async_trait::async_trait;
use chat_client::IncomingMessage;

/// Command handler trait.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Command trigger (e.g., "!help").
    fn trigger(&self) -> &str;

    /// Check if this handler matches the message.
    fn matches(&self, message: &IncomingMessage) -> bool {
        let text = message.content.trim_start();
        match text.strip_prefix(self.trigger()) {
            Some(rest) => rest.is_empty() || rest.starts_with(char::is_whitespace),
            None => false,
        }
    }

    /// Execute the command.
    ///
    /// `Some(text)` is sent back to the author; `None` means the handler
    /// already published its own output.
    async fn execute(&self, message: &IncomingMessage) -> AppResult<Option<String>>;
}

/// Text following the trigger, trimmed.
pub fn argument<'a>(message: &'a IncomingMessage, trigger: &str) -> &'a str {
    message
        .content
        .trim_start()
        .strip_prefix(trigger)
        .unwrap_or_default()
        .trim()
}
