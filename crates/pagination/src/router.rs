//! Map reaction events onto pagination commands.

use crate::engine::{PaginationEngine, Turn};
use crate::error::PaginationError;
use chat_client::{ReactionEvent, ReactionKind, UserId};
use session_store::Direction;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Pagination command bound to a glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Back,
    Forward,
    Stop,
}

/// Why an event was not dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Reaction removals never page.
    Removal,
    /// The bot's own affordance reactions.
    SelfReaction,
    NoSession,
    UnknownEmoji,
    NotInitiator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Ignored(IgnoreReason),
    Dispatched(Command, Turn),
}

/// Filters reaction events and forwards accepted ones to the engine.
pub struct ReactionRouter {
    engine: Arc<PaginationEngine>,
    bot_user: UserId,
}

impl ReactionRouter {
    pub fn new(engine: Arc<PaginationEngine>, bot_user: UserId) -> Self {
        Self { engine, bot_user }
    }

    /// Handle one reaction event.
    ///
    /// Filters run in order: removal, self, live session, glyph, initiator.
    /// The triggering reaction is removed before dispatch so the same user
    /// can react again.
    #[instrument(skip(self, event), fields(message = %event.message.message_id, emoji = %event.emoji))]
    pub async fn handle(&self, event: &ReactionEvent) -> Result<Route, PaginationError> {
        let command = match self.filter(event) {
            Ok(command) => command,
            Err(reason) => {
                debug!(?reason, "Ignoring reaction");
                return Ok(Route::Ignored(reason));
            }
        };

        if let Err(e) = self
            .engine
            .messenger()
            .remove_reaction(&event.message, &event.emoji, &event.user.id)
            .await
        {
            if e.is_expected() {
                debug!("Could not remove reaction: {}", e);
            } else {
                warn!("Failed to remove reaction: {}", e);
            }
        }

        let key = &event.message.message_id;
        let turn = match command {
            Command::Stop => self.engine.close(key).await,
            Command::Forward => self.engine.advance(key, Direction::Forward).await?,
            Command::Back => self.engine.advance(key, Direction::Back).await?,
        };

        debug!(?command, ?turn, "Dispatched reaction");
        Ok(Route::Dispatched(command, turn))
    }

    fn filter(&self, event: &ReactionEvent) -> Result<Command, IgnoreReason> {
        if event.kind == ReactionKind::Remove {
            return Err(IgnoreReason::Removal);
        }

        if event.user.id == self.bot_user {
            return Err(IgnoreReason::SelfReaction);
        }

        let config = self.engine.config();
        let session = self
            .engine
            .store()
            .get(&event.message.message_id)
            .ok_or(IgnoreReason::NoSession)?;

        let command = config
            .glyphs
            .command_for(&event.emoji)
            .ok_or(IgnoreReason::UnknownEmoji)?;

        if !session.initiator.matches(&event.user, config.initiator_match) {
            return Err(IgnoreReason::NotInitiator);
        }

        Ok(command)
    }
}
