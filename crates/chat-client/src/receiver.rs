//! Gateway event polling.

use crate::client::ChatClient;
use crate::types::*;
use std::time::Duration;
use tokio::time::sleep;
use tokio_stream::Stream;
use tracing::{debug, error};

const DEFAULT_ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Turns repeated `GET /gateway/events` calls into a stream of events.
pub struct EventReceiver {
    client: ChatClient,
    poll_interval: Duration,
    error_backoff: Duration,
}

impl EventReceiver {
    pub fn new(client: ChatClient, poll_interval: Duration) -> Self {
        Self {
            client,
            poll_interval,
            error_backoff: DEFAULT_ERROR_BACKOFF,
        }
    }

    /// Delay before polling again after a failed poll.
    pub fn with_error_backoff(mut self, backoff: Duration) -> Self {
        self.error_backoff = backoff;
        self
    }

    /// Poll forever. Errors are logged and retried, never yielded.
    pub fn stream(self) -> impl Stream<Item = GatewayEvent> {
        async_stream::stream! {
            loop {
                let events = match self.client.receive_events().await {
                    Ok(events) => events,
                    Err(e) => {
                        error!("Receive error: {}", e);
                        sleep(self.error_backoff).await;
                        continue;
                    }
                };

                for event in events {
                    match &event {
                        GatewayEvent::Message(msg) => debug!(
                            "Message from {}: {}",
                            msg.author.id,
                            msg.content.chars().take(50).collect::<String>()
                        ),
                        GatewayEvent::Reaction(r) => debug!(
                            "Reaction {} by {} on {}",
                            r.emoji, r.user.id, r.message.message_id
                        ),
                    }
                    yield event;
                }

                sleep(self.poll_interval).await;
            }
        }
    }
}
