//! In-memory session storage keyed by rendered message id.

use crate::types::Session;
use chat_client::MessageId;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Entry in the session store with its mutation guard.
struct SessionEntry {
    session: Session,
    guard: Arc<Mutex<()>>,
}

/// Process-scoped store of live browsing sessions.
///
/// All operations are synchronous map operations and never block on I/O.
/// Mutations that span awaits (page turns, closes) serialize on the
/// per-session guard returned by [`SessionStore::guard`].
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<DashMap<MessageId, SessionEntry>>,
}

impl SessionStore {
    pub fn new() -> Self {
        info!("In-memory session store initialized");
        Self::default()
    }

    /// Insert a session under `key`, replacing any previous entry.
    pub fn create(&self, key: MessageId, session: Session) {
        debug!(
            "Created session {} ({} results for {:?})",
            key,
            session.results.len(),
            session.query
        );
        self.sessions.insert(
            key,
            SessionEntry {
                session,
                guard: Arc::new(Mutex::new(())),
            },
        );
    }

    /// Get a copy of the session stored under `key`.
    pub fn get(&self, key: &MessageId) -> Option<Session> {
        self.sessions.get(key).map(|entry| entry.session.clone())
    }

    /// Replace the stored session.
    ///
    /// Returns `false` and stores nothing when `key` has been deleted in the
    /// meantime, so a finished page turn never resurrects a closed session.
    pub fn update(&self, key: &MessageId, session: Session) -> bool {
        match self.sessions.get_mut(key) {
            Some(mut entry) => {
                entry.session = session;
                true
            }
            None => false,
        }
    }

    /// Remove a session. Returns the removed session if it existed.
    pub fn delete(&self, key: &MessageId) -> Option<Session> {
        let removed = self.sessions.remove(key).map(|(_, entry)| entry.session);
        if removed.is_some() {
            debug!("Removed session {}", key);
        }
        removed
    }

    /// Snapshot of every live session.
    ///
    /// The copy is detached from the store, so callers may await between
    /// items while other tasks keep mutating the store.
    pub fn all(&self) -> Vec<Session> {
        self.sessions
            .iter()
            .map(|entry| entry.value().session.clone())
            .collect()
    }

    /// Mutation guard for the session under `key`.
    pub fn guard(&self, key: &MessageId) -> Option<Arc<Mutex<()>>> {
        self.sessions.get(key).map(|entry| entry.guard.clone())
    }

    pub fn contains(&self, key: &MessageId) -> bool {
        self.sessions.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
