//! In-memory fakes shared by the pagination tests.

use crate::error::ProducerError;
use crate::producer::{RenderableResult, ResultProducer};
use async_trait::async_trait;
use chat_client::{
    ChannelId, Content, MessageId, MessageRef, Messenger, MessengerError, User, UserId,
};
use session_store::{Initiator, ResultDescriptor};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Send(ChannelId, Content),
    Edit(MessageRef, Content),
    Delete(MessageRef),
    AddReaction(MessageRef, String),
    ClearReactions(MessageRef),
    RemoveReaction(MessageRef, String, UserId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Edit,
    Delete,
    ClearReactions,
}

/// Messenger that records every call and fails on demand.
#[derive(Default)]
pub struct RecordingMessenger {
    next_id: AtomicUsize,
    calls: Mutex<Vec<Call>>,
    failures: Mutex<Vec<(Op, Option<MessageId>, u16)>>,
    edit_delay: Mutex<Option<Duration>>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Fail `op` with `status` for every message.
    pub fn fail(&self, op: Op, status: u16) {
        self.failures.lock().unwrap().push((op, None, status));
    }

    /// Fail `op` with `status` for one message only.
    pub fn fail_for(&self, op: Op, message_id: &str, status: u16) {
        self.failures
            .lock()
            .unwrap()
            .push((op, Some(MessageId::new(message_id)), status));
    }

    pub fn set_edit_delay(&self, delay: Duration) {
        *self.edit_delay.lock().unwrap() = Some(delay);
    }

    /// Contents of every edit, in order.
    pub fn edits(&self) -> Vec<Content> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Edit(_, content) => Some(content),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn injected(&self, op: Op, message: &MessageRef) -> Result<(), MessengerError> {
        let failures = self.failures.lock().unwrap();
        let status = failures.iter().find_map(|(o, id, status)| {
            let applies = *o == op && id.as_ref().map_or(true, |id| *id == message.message_id);
            applies.then_some(*status)
        });

        match status {
            None => Ok(()),
            Some(404) => Err(MessengerError::NotFound),
            Some(403) => Err(MessengerError::Forbidden),
            Some(status) => Err(MessengerError::Api {
                status,
                message: "injected".into(),
            }),
        }
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send_message(
        &self,
        channel: &ChannelId,
        content: &Content,
    ) -> Result<MessageRef, MessengerError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.record(Call::Send(channel.clone(), content.clone()));
        Ok(MessageRef::new(channel.clone(), format!("page-{}", id)))
    }

    async fn edit_message(
        &self,
        message: &MessageRef,
        content: &Content,
    ) -> Result<(), MessengerError> {
        let delay = *self.edit_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.injected(Op::Edit, message)?;
        self.record(Call::Edit(message.clone(), content.clone()));
        Ok(())
    }

    async fn delete_message(&self, message: &MessageRef) -> Result<(), MessengerError> {
        self.record(Call::Delete(message.clone()));
        self.injected(Op::Delete, message)
    }

    async fn add_reaction(&self, message: &MessageRef, emoji: &str) -> Result<(), MessengerError> {
        self.record(Call::AddReaction(message.clone(), emoji.to_string()));
        Ok(())
    }

    async fn clear_reactions(&self, message: &MessageRef) -> Result<(), MessengerError> {
        self.record(Call::ClearReactions(message.clone()));
        self.injected(Op::ClearReactions, message)
    }

    async fn remove_reaction(
        &self,
        message: &MessageRef,
        emoji: &str,
        user: &UserId,
    ) -> Result<(), MessengerError> {
        self.record(Call::RemoveReaction(
            message.clone(),
            emoji.to_string(),
            user.clone(),
        ));
        Ok(())
    }
}

/// Producer over a fixed list where any id can be marked invalid or slow.
pub struct StaticProducer {
    name: String,
    results: Vec<ResultDescriptor>,
    invalid: Mutex<HashSet<String>>,
    slow: Mutex<HashSet<String>>,
    validations: AtomicUsize,
}

impl StaticProducer {
    pub fn new(name: &str, ids: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            results: ids
                .iter()
                .map(|id| {
                    ResultDescriptor::new(*id, format!("https://img.example/{}.png", id))
                        .with_title(id.to_uppercase())
                })
                .collect(),
            invalid: Mutex::new(HashSet::new()),
            slow: Mutex::new(HashSet::new()),
            validations: AtomicUsize::new(0),
        }
    }

    pub fn invalidate(&self, id: &str) {
        self.invalid.lock().unwrap().insert(id.to_string());
    }

    /// Make validation of `id` hang for a minute.
    pub fn make_slow(&self, id: &str) {
        self.slow.lock().unwrap().insert(id.to_string());
    }

    pub fn validations(&self) -> usize {
        self.validations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResultProducer for StaticProducer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, _query: &str) -> Result<Vec<ResultDescriptor>, ProducerError> {
        Ok(self.results.clone())
    }

    async fn validate(
        &self,
        descriptor: &ResultDescriptor,
    ) -> Result<Option<RenderableResult>, ProducerError> {
        self.validations.fetch_add(1, Ordering::SeqCst);

        let slow = self.slow.lock().unwrap().contains(&descriptor.id);
        if slow {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }

        if self.invalid.lock().unwrap().contains(&descriptor.id) {
            return Ok(None);
        }

        let title = descriptor
            .title
            .clone()
            .unwrap_or_else(|| descriptor.id.clone());
        Ok(Some(
            RenderableResult::new(title).with_image(descriptor.url.clone()),
        ))
    }
}

pub fn user(id: &str, name: &str) -> User {
    User {
        id: UserId::new(id),
        name: name.to_string(),
        bot: false,
    }
}

pub fn alice() -> Initiator {
    Initiator::from(&user("user-1", "alice"))
}

/// Title shown by the embed of `content`.
pub fn title(content: &Content) -> &str {
    content
        .embed
        .as_ref()
        .and_then(|e| e.title.as_deref())
        .unwrap_or_default()
}

/// Footer (page label) shown by the embed of `content`.
pub fn footer(content: &Content) -> &str {
    content
        .embed
        .as_ref()
        .and_then(|e| e.footer.as_deref())
        .unwrap_or_default()
}
