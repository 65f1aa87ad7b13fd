//! Search commands - start a paginated session for a producer.

use crate::commands::{argument, CommandHandler};
use crate::error::AppResult;
use async_trait::async_trait;
use chat_client::IncomingMessage;
use pagination::{Initiator, PaginationEngine, PaginationError, SearchRequest};
use std::sync::Arc;
use tracing::info;

/// Handler binding a trigger like `!img` to one result producer.
pub struct SearchHandler {
    trigger: String,
    producer: String,
    engine: Arc<PaginationEngine>,
}

impl SearchHandler {
    pub fn new(
        trigger: impl Into<String>,
        producer: impl Into<String>,
        engine: Arc<PaginationEngine>,
    ) -> Self {
        Self {
            trigger: trigger.into(),
            producer: producer.into(),
            engine,
        }
    }

    pub fn producer(&self) -> &str {
        &self.producer
    }
}

#[async_trait]
impl CommandHandler for SearchHandler {
    fn trigger(&self) -> &str {
        &self.trigger
    }

    async fn execute(&self, message: &IncomingMessage) -> AppResult<Option<String>> {
        let query = argument(message, &self.trigger);
        if query.is_empty() {
            return Ok(Some(format!("Usage: {} <query>", self.trigger)));
        }

        let request = SearchRequest {
            origin: message.message_ref(),
            initiator: Initiator::from(&message.author),
        };

        match self.engine.start(&self.producer, query, request).await {
            Ok(page) => {
                info!(
                    producer = %self.producer,
                    page = %page.message_id,
                    "Started search session"
                );
                Ok(None)
            }
            Err(e @ PaginationError::NoResults { .. }) => Ok(Some(e.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}
