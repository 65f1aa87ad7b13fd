//! Common test utilities for integration tests.

use chat_client::{ChannelId, ChatClient, IncomingMessage, MessageId, Messenger, User, UserId};
use chrono::Utc;
use pagination::{PaginationConfig, PaginationEngine, ProducerRegistry, ReactionRouter, SessionStore};
use search_bot::commands::{CommandHandler, HelpHandler, SearchHandler};
use search_bot::dispatch::Dispatcher;
use search_bot::notifier::OperatorNotifier;
use search_producers::SteamProducer;
use std::sync::Arc;
use std::time::Duration;
use wiremock::MockServer;

pub struct TestBot {
    pub dispatcher: Arc<Dispatcher>,
    pub engine: Arc<PaginationEngine>,
}

/// Wire a bot against a mock chat API and a mock Steam store.
pub fn test_bot(chat: &MockServer, steam: &MockServer, operator: Option<&str>) -> TestBot {
    let client = ChatClient::new(chat.uri(), "test-token").unwrap();
    let messenger: Arc<dyn Messenger> = Arc::new(client);

    let mut registry = ProducerRegistry::new();
    registry.register(Arc::new(SteamProducer::new().with_base_url(steam.uri())));

    let config = PaginationConfig {
        page_turn_interval: Duration::ZERO,
        ..Default::default()
    };
    let engine = Arc::new(PaginationEngine::new(
        messenger.clone(),
        SessionStore::new(),
        Arc::new(registry),
        config.clone(),
    ));

    let handlers: Vec<Box<dyn CommandHandler>> = vec![
        Box::new(SearchHandler::new("!steam", "steam", engine.clone())),
        Box::new(HelpHandler::new(
            &[("!steam", "Look up a game on the Steam store")],
            &config.glyphs,
        )),
    ];

    let router = ReactionRouter::new(engine.clone(), UserId::new("bot-1"));
    let notifier = OperatorNotifier::new(messenger.clone(), operator.map(ChannelId::new));

    TestBot {
        dispatcher: Arc::new(Dispatcher::new(handlers, messenger, router, notifier)),
        engine,
    }
}

pub fn user(id: &str, name: &str) -> User {
    User {
        id: UserId::new(id),
        name: name.into(),
        bot: false,
    }
}

/// A command typed by `user-1` (alice) in `chan-1`.
pub fn command(text: &str) -> IncomingMessage {
    IncomingMessage {
        id: MessageId::new("cmd-1"),
        channel_id: ChannelId::new("chan-1"),
        author: user("user-1", "alice"),
        content: text.into(),
        timestamp: Utc::now(),
    }
}
