//! Chat platform API types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

id_type!(
    /// Platform-assigned channel identifier.
    ChannelId
);
id_type!(
    /// Platform-assigned message identifier.
    MessageId
);
id_type!(
    /// Platform-assigned user identifier.
    UserId
);

/// Fully qualified reference to a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageRef {
    pub channel_id: ChannelId,
    pub message_id: MessageId,
}

impl MessageRef {
    pub fn new(channel_id: impl Into<ChannelId>, message_id: impl Into<MessageId>) -> Self {
        Self {
            channel_id: channel_id.into(),
            message_id: message_id.into(),
        }
    }
}

impl From<String> for ChannelId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<String> for MessageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A platform user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(rename = "username")]
    pub name: String,
    #[serde(default)]
    pub bot: bool,
}

impl User {
    /// Mention markup for this user.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}

/// Rich embed attached to an outgoing message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub inline: bool,
}

/// Outgoing message body (plain text, embed, or both).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(rename = "content", skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed: Option<Embed>,
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            embed: None,
        }
    }

    pub fn embed(embed: Embed) -> Self {
        Self {
            text: None,
            embed: Some(embed),
        }
    }
}

/// Response body of a message create call.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedMessage {
    pub id: MessageId,
    pub channel_id: ChannelId,
}

/// A message posted in a channel the bot can see.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    pub id: MessageId,
    pub channel_id: ChannelId,
    pub author: User,
    #[serde(default)]
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl IncomingMessage {
    pub fn message_ref(&self) -> MessageRef {
        MessageRef {
            channel_id: self.channel_id.clone(),
            message_id: self.id.clone(),
        }
    }

    /// Prefix a reply with a mention of the author.
    pub fn mention_author(&self, text: &str) -> String {
        format!("{} {}", self.author.mention(), text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionKind {
    Add,
    Remove,
}

/// A reaction being added to or removed from a message.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactionEvent {
    pub kind: ReactionKind,
    pub emoji: String,
    pub user: User,
    pub message: MessageRef,
}

#[derive(Debug, Clone, Deserialize)]
struct ReactionPayload {
    emoji: String,
    user: User,
    channel_id: ChannelId,
    message_id: MessageId,
}

impl ReactionPayload {
    fn into_event(self, kind: ReactionKind) -> ReactionEvent {
        ReactionEvent {
            kind,
            emoji: self.emoji,
            user: self.user,
            message: MessageRef {
                channel_id: self.channel_id,
                message_id: self.message_id,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
enum RawGatewayEvent {
    MessageCreate(IncomingMessage),
    ReactionAdd(ReactionPayload),
    ReactionRemove(ReactionPayload),
}

/// Event delivered by the gateway.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawGatewayEvent")]
pub enum GatewayEvent {
    Message(IncomingMessage),
    Reaction(ReactionEvent),
}

impl From<RawGatewayEvent> for GatewayEvent {
    fn from(raw: RawGatewayEvent) -> Self {
        match raw {
            RawGatewayEvent::MessageCreate(msg) => Self::Message(msg),
            RawGatewayEvent::ReactionAdd(r) => Self::Reaction(r.into_event(ReactionKind::Add)),
            RawGatewayEvent::ReactionRemove(r) => {
                Self::Reaction(r.into_event(ReactionKind::Remove))
            }
        }
    }
}
