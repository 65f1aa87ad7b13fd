//! Routes gateway events to command handlers and the reaction router.

use crate::commands::CommandHandler;
use crate::notifier::OperatorNotifier;
use chat_client::{Content, GatewayEvent, IncomingMessage, Messenger, ReactionEvent};
use pagination::{ReactionRouter, Route};
use std::sync::Arc;
use tracing::{debug, error, warn};

const GENERIC_FAILURE: &str = "Sorry, something went wrong.";

pub struct Dispatcher {
    handlers: Vec<Box<dyn CommandHandler>>,
    messenger: Arc<dyn Messenger>,
    router: ReactionRouter,
    notifier: OperatorNotifier,
}

impl Dispatcher {
    pub fn new(
        handlers: Vec<Box<dyn CommandHandler>>,
        messenger: Arc<dyn Messenger>,
        router: ReactionRouter,
        notifier: OperatorNotifier,
    ) -> Self {
        Self {
            handlers,
            messenger,
            router,
            notifier,
        }
    }

    pub fn handlers(&self) -> &[Box<dyn CommandHandler>] {
        &self.handlers
    }

    pub async fn handle(&self, event: GatewayEvent) {
        match event {
            GatewayEvent::Message(message) => self.handle_message(&message).await,
            GatewayEvent::Reaction(reaction) => {
                self.handle_reaction(&reaction).await;
            }
        }
    }

    /// Run the first matching command and post its reply.
    ///
    /// Handler replies go out as written; only a failed command gets the
    /// author mentioned.
    pub async fn handle_message(&self, message: &IncomingMessage) {
        if message.author.bot {
            return;
        }

        let Some(handler) = self.handlers.iter().find(|h| h.matches(message)) else {
            return;
        };

        let reply = match handler.execute(message).await {
            Ok(Some(reply)) => reply,
            Ok(None) => return,
            Err(e) if e.is_unexpected() => {
                let context = format!("Command {} failed", handler.trigger());
                self.notifier.report(&context, &e).await;
                message.mention_author(GENERIC_FAILURE)
            }
            Err(e) => {
                // The channel is gone or closed to the bot; a reply would fail too.
                warn!("Command {} failed: {}", handler.trigger(), e);
                return;
            }
        };

        let content = Content::text(reply);
        if let Err(e) = self.messenger.send_message(&message.channel_id, &content).await {
            error!("Failed to send reply: {}", e);
        }
    }

    /// Forward a reaction to the router. Failures stop here.
    pub async fn handle_reaction(&self, event: &ReactionEvent) -> Option<Route> {
        match self.router.handle(event).await {
            Ok(route) => Some(route),
            Err(e) if e.is_unexpected() => {
                self.notifier.report("Reaction handling failed", &e).await;
                None
            }
            Err(e) => {
                debug!("Reaction not handled: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::SearchHandler;
    use crate::testing::{incoming, FixedProducer, MockMessenger};
    use chat_client::{ChannelId, MessageRef, MessengerError, UserId};
    use mockall::predicate::eq;
    use pagination::{PaginationConfig, PaginationEngine, ProducerRegistry, SessionStore};

    fn dispatcher(messenger: MockMessenger) -> Dispatcher {
        let messenger: Arc<dyn Messenger> = Arc::new(messenger);
        let mut registry = ProducerRegistry::new();
        registry.register(Arc::new(FixedProducer::new("images", &["tabby"])));
        let engine = Arc::new(PaginationEngine::new(
            messenger.clone(),
            SessionStore::new(),
            Arc::new(registry),
            PaginationConfig::default(),
        ));

        Dispatcher::new(
            vec![Box::new(SearchHandler::new("!img", "images", engine.clone()))],
            messenger.clone(),
            ReactionRouter::new(engine, UserId::new("bot-1")),
            OperatorNotifier::new(messenger, Some(ChannelId::new("ops"))),
        )
    }

    #[tokio::test]
    async fn test_handler_reply_is_not_prefixed() {
        let mut messenger = MockMessenger::new();
        messenger
            .expect_send_message()
            .with(
                eq(ChannelId::new("chan-1")),
                eq(Content::text("No results found for `none`")),
            )
            .times(1)
            .returning(|_, _| Ok(MessageRef::new("chan-1", "reply-1")));

        dispatcher(messenger)
            .handle_message(&incoming("!img none"))
            .await;
    }

    #[tokio::test]
    async fn test_unexpected_failure_mentions_author_and_reports() {
        let mut messenger = MockMessenger::new();
        messenger
            .expect_send_message()
            .withf(|channel, content| channel.as_str() == "chan-1" && content.embed.is_some())
            .times(1)
            .returning(|_, _| {
                Err(MessengerError::Api {
                    status: 500,
                    message: "down".into(),
                })
            });
        messenger
            .expect_send_message()
            .withf(|channel, _| channel.as_str() == "ops")
            .times(1)
            .returning(|_, _| Ok(MessageRef::new("ops", "report-1")));
        messenger
            .expect_send_message()
            .with(
                eq(ChannelId::new("chan-1")),
                eq(Content::text("<@user-1> Sorry, something went wrong.")),
            )
            .times(1)
            .returning(|_, _| Ok(MessageRef::new("chan-1", "reply-1")));

        dispatcher(messenger)
            .handle_message(&incoming("!img cats"))
            .await;
    }

    #[tokio::test]
    async fn test_forbidden_channel_is_not_reported_or_answered() {
        let mut messenger = MockMessenger::new();
        messenger
            .expect_send_message()
            .times(1)
            .returning(|_, _| Err(MessengerError::Forbidden));

        dispatcher(messenger)
            .handle_message(&incoming("!img cats"))
            .await;
    }
}
