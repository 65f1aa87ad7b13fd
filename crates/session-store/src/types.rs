//! Browsing session types.

use chat_client::{ChannelId, MessageId, MessageRef, User, UserId};
use serde::Deserialize;
use std::time::Duration;
use tokio::time::Instant;

/// One candidate result as returned by a producer's search.
///
/// Descriptors are opaque to the pager; only the producer that created
/// them knows how to turn one into something displayable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultDescriptor {
    /// Producer-specific identifier (image URL, app id, ...).
    pub id: String,
    pub title: Option<String>,
    pub url: String,
}

impl ResultDescriptor {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            url: url.into(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// How a reacting user is matched against the session's initiator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitiatorMatch {
    /// Only the exact user id that started the search.
    #[default]
    Strict,
    /// Any user whose display name equals the initiator's.
    DisplayName,
}

/// The user who started a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Initiator {
    pub user_id: UserId,
    pub name: String,
}

impl Initiator {
    pub fn matches(&self, user: &User, mode: InitiatorMatch) -> bool {
        match mode {
            InitiatorMatch::Strict => self.user_id == user.id,
            InitiatorMatch::DisplayName => self.name == user.name,
        }
    }
}

impl From<&User> for Initiator {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            name: user.name.clone(),
        }
    }
}

/// Page turn direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Back,
}

impl Direction {
    /// Index reached by one step from `from` in a list of `len` items.
    ///
    /// Wraps in both directions. `len` must be non-zero.
    pub fn step(self, from: usize, len: usize) -> usize {
        match self {
            Direction::Forward => (from + 1) % len,
            Direction::Back => (from + len - 1) % len,
        }
    }
}

/// An active paginated browsing context.
#[derive(Debug, Clone)]
pub struct Session {
    /// Name of the producer that owns `results`.
    pub producer: String,
    pub query: String,
    pub results: Vec<ResultDescriptor>,
    pub index: usize,
    pub last_activity: Instant,
    pub initiator: Initiator,
    /// The command message that started the search.
    pub origin: MessageRef,
    pub channel: ChannelId,
    /// The bot's rendered page; `None` until the first render returns.
    pub message: Option<MessageRef>,
}

impl Session {
    pub fn new(
        producer: impl Into<String>,
        query: impl Into<String>,
        results: Vec<ResultDescriptor>,
        initiator: Initiator,
        origin: MessageRef,
    ) -> Self {
        Self {
            producer: producer.into(),
            query: query.into(),
            results,
            index: 0,
            last_activity: Instant::now(),
            initiator,
            channel: origin.channel_id.clone(),
            origin,
            message: None,
        }
    }

    /// Store key: the id of the rendered message.
    pub fn key(&self) -> Option<&MessageId> {
        self.message.as_ref().map(|m| &m.message_id)
    }

    pub fn current(&self) -> Option<&ResultDescriptor> {
        self.results.get(self.index)
    }

    pub fn page_label(&self) -> String {
        format!("Page {}/{}", self.index + 1, self.results.len())
    }

    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    /// Whether the last activity is strictly older than `threshold`.
    pub fn is_idle(&self, threshold: Duration) -> bool {
        self.last_activity.elapsed() > threshold
    }

    /// Remove the descriptor at `position`, keeping `index` on the same item
    /// when an earlier entry is removed.
    pub fn remove_result(&mut self, position: usize) -> Option<ResultDescriptor> {
        if position >= self.results.len() {
            return None;
        }

        let removed = self.results.remove(position);
        if position < self.index {
            self.index -= 1;
        }
        if self.index >= self.results.len() {
            self.index = 0;
        }
        Some(removed)
    }
}
