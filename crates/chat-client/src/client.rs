//! Chat platform HTTP client.

use crate::error::MessengerError;
use crate::messenger::Messenger;
use crate::types::*;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::{debug, instrument, warn};
use urlencoding::encode;

/// REST client for the chat platform.
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    base_url: String,
    token: SecretString,
}

impl ChatClient {
    /// Create a new chat client.
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, MessengerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: SecretString::new(token.into()),
        })
    }

    /// Check if the platform API is reachable.
    pub async fn health_check(&self) -> bool {
        self.authorized(self.client.get(format!("{}/health", self.base_url)))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    /// Fetch pending gateway events.
    #[instrument(skip(self))]
    pub async fn receive_events(&self) -> Result<Vec<GatewayEvent>, MessengerError> {
        let response = self
            .authorized(self.client.get(format!("{}/gateway/events", self.base_url)))
            .send()
            .await?;

        let events: Vec<GatewayEvent> = check(response).await?.json().await?;
        if !events.is_empty() {
            debug!("Received {} gateway events", events.len());
        }
        Ok(events)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(
            "Authorization",
            format!("Bot {}", self.token.expose_secret()),
        )
    }

    fn message_url(&self, message: &MessageRef) -> String {
        format!(
            "{}/channels/{}/messages/{}",
            self.base_url,
            encode(message.channel_id.as_str()),
            encode(message.message_id.as_str())
        )
    }

    fn reactions_url(&self, message: &MessageRef) -> String {
        format!("{}/reactions", self.message_url(message))
    }
}

/// Map platform status codes onto `MessengerError`.
async fn check(response: Response) -> Result<Response, MessengerError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::NOT_FOUND => Err(MessengerError::NotFound),
        StatusCode::FORBIDDEN => Err(MessengerError::Forbidden),
        StatusCode::TOO_MANY_REQUESTS => Err(MessengerError::RateLimited),
        _ => {
            let message = response.text().await.unwrap_or_default();
            warn!("Chat API error {}: {}", status, message);
            Err(MessengerError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[async_trait]
impl Messenger for ChatClient {
    #[instrument(skip(self, content))]
    async fn send_message(
        &self,
        channel: &ChannelId,
        content: &Content,
    ) -> Result<MessageRef, MessengerError> {
        let response = self
            .authorized(self.client.post(format!(
                "{}/channels/{}/messages",
                self.base_url,
                encode(channel.as_str())
            )))
            .json(content)
            .send()
            .await?;

        let created: CreatedMessage = check(response).await?.json().await?;
        debug!("Sent message {} to {}", created.id, created.channel_id);

        Ok(MessageRef {
            channel_id: created.channel_id,
            message_id: created.id,
        })
    }

    #[instrument(skip(self, content))]
    async fn edit_message(
        &self,
        message: &MessageRef,
        content: &Content,
    ) -> Result<(), MessengerError> {
        let response = self
            .authorized(self.client.patch(self.message_url(message)))
            .json(content)
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_message(&self, message: &MessageRef) -> Result<(), MessengerError> {
        let response = self
            .authorized(self.client.delete(self.message_url(message)))
            .send()
            .await?;

        check(response).await?;
        debug!("Deleted message {}", message.message_id);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn add_reaction(&self, message: &MessageRef, emoji: &str) -> Result<(), MessengerError> {
        let response = self
            .authorized(self.client.put(format!(
                "{}/{}/@me",
                self.reactions_url(message),
                encode(emoji)
            )))
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn clear_reactions(&self, message: &MessageRef) -> Result<(), MessengerError> {
        let response = self
            .authorized(self.client.delete(self.reactions_url(message)))
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove_reaction(
        &self,
        message: &MessageRef,
        emoji: &str,
        user: &UserId,
    ) -> Result<(), MessengerError> {
        let response = self
            .authorized(self.client.delete(format!(
                "{}/{}/{}",
                self.reactions_url(message),
                encode(emoji),
                encode(user.as_str())
            )))
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }
}
