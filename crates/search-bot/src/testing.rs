//! Test doubles for the bot crate.

use async_trait::async_trait;
use chat_client::{
    ChannelId, Content, IncomingMessage, MessageId, MessageRef, Messenger, MessengerError, User,
    UserId,
};
use chrono::Utc;
use mockall::mock;
use pagination::{ProducerError, RenderableResult, ResultDescriptor, ResultProducer};

mock! {
    pub Messenger {}

    #[async_trait]
    impl Messenger for Messenger {
        async fn send_message(
            &self,
            channel: &ChannelId,
            content: &Content,
        ) -> Result<MessageRef, MessengerError>;
        async fn edit_message(
            &self,
            message: &MessageRef,
            content: &Content,
        ) -> Result<(), MessengerError>;
        async fn delete_message(&self, message: &MessageRef) -> Result<(), MessengerError>;
        async fn add_reaction(&self, message: &MessageRef, emoji: &str) -> Result<(), MessengerError>;
        async fn clear_reactions(&self, message: &MessageRef) -> Result<(), MessengerError>;
        async fn remove_reaction(
            &self,
            message: &MessageRef,
            emoji: &str,
            user: &UserId,
        ) -> Result<(), MessengerError>;
    }
}

/// Producer returning the same titles for every query; `"none"` finds nothing.
pub struct FixedProducer {
    name: String,
    titles: Vec<String>,
}

impl FixedProducer {
    pub fn new(name: &str, titles: &[&str]) -> Self {
        Self {
            name: name.into(),
            titles: titles.iter().map(|t| t.to_string()).collect(),
        }
    }
}

#[async_trait]
impl ResultProducer for FixedProducer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, query: &str) -> Result<Vec<ResultDescriptor>, ProducerError> {
        if query == "none" {
            return Ok(Vec::new());
        }
        Ok(self
            .titles
            .iter()
            .map(|t| {
                ResultDescriptor::new(t.clone(), format!("https://example.com/{}", t))
                    .with_title(t.clone())
            })
            .collect())
    }

    async fn validate(
        &self,
        descriptor: &ResultDescriptor,
    ) -> Result<Option<RenderableResult>, ProducerError> {
        Ok(Some(
            RenderableResult::new(descriptor.id.clone()).with_url(descriptor.url.clone()),
        ))
    }
}

pub fn incoming(text: &str) -> IncomingMessage {
    IncomingMessage {
        id: MessageId::new("cmd-1"),
        channel_id: ChannelId::new("chan-1"),
        author: User {
            id: UserId::new("user-1"),
            name: "alice".into(),
            bot: false,
        },
        content: text.into(),
        timestamp: Utc::now(),
    }
}
