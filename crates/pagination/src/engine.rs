//! Pagination engine: render pages and move between them.

use crate::config::PaginationConfig;
use crate::error::PaginationError;
use crate::producer::{RenderableResult, ResultProducer};
use crate::registry::ProducerRegistry;
use chat_client::{MessageId, MessageRef, Messenger, MessengerError};
use futures::future::join_all;
use session_store::{Direction, Initiator, ResultDescriptor, Session, SessionStore};
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, error, info, instrument, warn};

/// Who asked for a search and where.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// The command message; its channel receives the rendered page.
    pub origin: MessageRef,
    pub initiator: Initiator,
}

/// Outcome of a page turn or close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    /// A page was rendered; `index` is zero-based.
    Rendered { index: usize, total: usize },
    /// Ignored because the previous turn was too recent.
    RateLimited,
    /// Every remaining candidate failed validation; the session is gone.
    Exhausted,
    /// The session was closed.
    Closed,
    /// No live session under that key.
    Missing,
}

/// Drives sessions: search, lazy validation, rendering and page turns.
pub struct PaginationEngine {
    messenger: Arc<dyn Messenger>,
    store: SessionStore,
    producers: Arc<ProducerRegistry>,
    config: PaginationConfig,
}

impl PaginationEngine {
    pub fn new(
        messenger: Arc<dyn Messenger>,
        store: SessionStore,
        producers: Arc<ProducerRegistry>,
        config: PaginationConfig,
    ) -> Self {
        Self {
            messenger,
            store,
            producers,
            config,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn messenger(&self) -> &Arc<dyn Messenger> {
        &self.messenger
    }

    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    /// Run a search and render its first valid result.
    ///
    /// The session is only stored once the platform has assigned an id to
    /// the rendered message.
    #[instrument(skip(self, request), fields(channel = %request.origin.channel_id))]
    pub async fn start(
        &self,
        producer_name: &str,
        query: &str,
        request: SearchRequest,
    ) -> Result<MessageRef, PaginationError> {
        let producer = self.producer(producer_name)?;
        let results = producer.search(query).await?;

        if results.is_empty() {
            debug!("Producer returned no candidates");
            return Err(PaginationError::NoResults {
                query: query.to_string(),
            });
        }

        let mut session = Session::new(
            producer_name,
            query,
            results,
            request.initiator,
            request.origin,
        );

        let Some(result) = self
            .seek(producer.as_ref(), &mut session, 0, Direction::Forward)
            .await
        else {
            debug!("Every candidate failed validation");
            return Err(PaginationError::NoResults {
                query: query.to_string(),
            });
        };

        let message = self.render(&mut session, &result).await?;
        info!(
            "Started session {} with {} results",
            message.message_id,
            session.results.len()
        );
        self.store.create(message.message_id.clone(), session);

        Ok(message)
    }

    /// Move one page in `direction`, skipping candidates that fail
    /// validation.
    ///
    /// The rate limit is checked once per call, not per skipped candidate.
    #[instrument(skip(self))]
    pub async fn advance(
        &self,
        key: &MessageId,
        direction: Direction,
    ) -> Result<Turn, PaginationError> {
        let Some(guard) = self.store.guard(key) else {
            return Ok(Turn::Missing);
        };
        let _lock = guard.lock().await;

        let Some(mut session) = self.store.get(key) else {
            return Ok(Turn::Missing);
        };

        if session.last_activity.elapsed() < self.config.page_turn_interval {
            debug!("Page turn rate limited");
            return Ok(Turn::RateLimited);
        }

        let producer = self.producer(&session.producer)?;
        let start = direction.step(session.index, session.results.len());

        let Some(result) = self
            .seek(producer.as_ref(), &mut session, start, direction)
            .await
        else {
            self.exhaust(key, &session).await;
            return Ok(Turn::Exhausted);
        };

        match self.render(&mut session, &result).await {
            Ok(_) => {}
            Err(e) if e.is_expected() => {
                debug!("Rendered message is gone ({}), closing session", e);
                self.close_session(&session).await;
                return Ok(Turn::Closed);
            }
            Err(e) => {
                self.close_session(&session).await;
                return Err(e.into());
            }
        }

        let turn = Turn::Rendered {
            index: session.index,
            total: session.results.len(),
        };

        if !self.store.update(key, session) {
            debug!("Session was evicted during the page turn");
            return Ok(Turn::Missing);
        }

        Ok(turn)
    }

    /// Delete the command and result messages and forget the session.
    #[instrument(skip(self))]
    pub async fn close(&self, key: &MessageId) -> Turn {
        let Some(guard) = self.store.guard(key) else {
            return Turn::Missing;
        };
        let _lock = guard.lock().await;

        match self.store.get(key) {
            Some(session) => {
                self.close_session(&session).await;
                Turn::Closed
            }
            None => Turn::Missing,
        }
    }

    fn producer(&self, name: &str) -> Result<Arc<dyn ResultProducer>, PaginationError> {
        self.producers
            .get(name)
            .ok_or_else(|| PaginationError::UnknownProducer(name.to_string()))
    }

    /// Find the first valid candidate starting at `position` and moving in
    /// `direction`, removing invalid ones as they are found.
    ///
    /// Bounded by the list length; on success `session.index` points at the
    /// returned result.
    async fn seek(
        &self,
        producer: &dyn ResultProducer,
        session: &mut Session,
        mut position: usize,
        direction: Direction,
    ) -> Option<RenderableResult> {
        for _ in 0..session.results.len() {
            let validated = self
                .validate(producer, &session.results[position])
                .await;

            if let Some(result) = validated {
                session.index = position;
                return Some(result);
            }

            if let Some(removed) = session.remove_result(position) {
                debug!(id = %removed.id, "Dropped invalid candidate");
            }
            let len = session.results.len();
            if len == 0 {
                return None;
            }

            position = match direction {
                Direction::Forward => position % len,
                Direction::Back => position.checked_sub(1).unwrap_or(len - 1),
            };
        }

        None
    }

    async fn validate(
        &self,
        producer: &dyn ResultProducer,
        descriptor: &ResultDescriptor,
    ) -> Option<RenderableResult> {
        match timeout(self.config.validate_timeout, producer.validate(descriptor)).await {
            Ok(Ok(Some(result))) => Some(result),
            Ok(Ok(None)) => {
                debug!(id = %descriptor.id, "Candidate no longer valid");
                None
            }
            Ok(Err(e)) => {
                warn!(id = %descriptor.id, error = %e, "Candidate validation failed");
                None
            }
            Err(_) => {
                warn!(
                    id = %descriptor.id,
                    timeout = ?self.config.validate_timeout,
                    "Candidate validation timed out"
                );
                None
            }
        }
    }

    /// Publish the page for `result`: edit the existing message, or send the
    /// first one.
    async fn render(
        &self,
        session: &mut Session,
        result: &RenderableResult,
    ) -> Result<MessageRef, MessengerError> {
        let content = result.to_content(&session.page_label());

        let message = match &session.message {
            Some(message) => {
                self.messenger.edit_message(message, &content).await?;
                message.clone()
            }
            None => self.messenger.send_message(&session.channel, &content).await?,
        };

        // Edits may drop reactions on some clients, so re-apply unless the
        // session was evicted while the page was being published.
        let evicted = session.key().is_some_and(|key| !self.store.contains(key));
        if !evicted {
            self.apply_affordances(&message).await;
        }
        session.message = Some(message.clone());
        session.touch();
        Ok(message)
    }

    async fn apply_affordances(&self, message: &MessageRef) {
        for glyph in self.config.glyphs.all() {
            if let Err(e) = self.messenger.add_reaction(message, glyph).await {
                if e.is_expected() {
                    debug!("Cannot add {} to {}: {}", glyph, message.message_id, e);
                } else {
                    warn!("Failed to add {} to {}: {}", glyph, message.message_id, e);
                }
            }
        }
    }

    async fn exhaust(&self, key: &MessageId, session: &Session) {
        info!("Session {} ran out of valid results", key);
        self.store.delete(key);

        if let Some(message) = &session.message {
            if let Err(e) = self.messenger.clear_reactions(message).await {
                if !e.is_expected() {
                    warn!("Failed to clear reactions on {}: {}", key, e);
                }
            }
        }
    }

    async fn close_session(&self, session: &Session) {
        let targets = [Some(&session.origin), session.message.as_ref()];
        join_all(targets.into_iter().flatten().map(|m| self.delete_quietly(m))).await;

        if let Some(key) = session.key() {
            self.store.delete(key);
            info!("Closed session {}", key);
        }
    }

    async fn delete_quietly(&self, message: &MessageRef) {
        match self.messenger.delete_message(message).await {
            Ok(()) => {}
            Err(e) if e.is_expected() => {
                debug!("Could not delete {}: {}", message.message_id, e);
            }
            Err(e) => {
                error!("Failed to delete {}: {}", message.message_id, e);
            }
        }
    }
}
