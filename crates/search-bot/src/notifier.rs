//! Operator notification for unexpected failures.

use chat_client::{ChannelId, Content, Messenger};
use std::fmt::Display;
use std::sync::Arc;
use tracing::{error, warn};

/// Reports unexpected errors to the error log and, when configured, to an
/// operator channel.
#[derive(Clone)]
pub struct OperatorNotifier {
    messenger: Arc<dyn Messenger>,
    channel: Option<ChannelId>,
}

impl OperatorNotifier {
    pub fn new(messenger: Arc<dyn Messenger>, channel: Option<ChannelId>) -> Self {
        Self { messenger, channel }
    }

    /// Log `err` and post it to the operator channel. Never fails.
    pub async fn report(&self, context: &str, err: &(dyn Display + Sync)) {
        error!(context = %context, "Unexpected error: {}", err);

        let Some(channel) = &self.channel else {
            return;
        };

        let content = Content::text(format!("⚠️ {}: {}", context, err));
        if let Err(e) = self.messenger.send_message(channel, &content).await {
            warn!("Failed to notify operator: {}", e);
        }
    }
}
