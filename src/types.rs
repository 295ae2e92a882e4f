//! Core types for the chat backend.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ChatError;

/// Unique identifier for a user.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({})", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        UserId(s.to_string())
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        UserId(s)
    }
}

/// Unique identifier for a conversation. Used as the fan-out key.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(pub String);

impl ConversationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConversationId({})", self.0)
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(s: &str) -> Self {
        ConversationId(s.to_string())
    }
}

impl From<String> for ConversationId {
    fn from(s: String) -> Self {
        ConversationId(s)
    }
}

/// Unique identifier for a message.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageId({})", self.0)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        MessageId(s.to_string())
    }
}

impl From<String> for MessageId {
    fn from(s: String) -> Self {
        MessageId(s)
    }
}

/// Kind of content carried by a message.
///
/// Serialized as `"TEXT"` / `"IMAGE"`; any other value is rejected at the
/// boundary, before reaching the core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentType {
    Text,
    Image,
}

impl ContentType {
    /// All valid content types, in wire order.
    pub const ALL: [ContentType; 2] = [ContentType::Text, ContentType::Image];

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Text => "TEXT",
            ContentType::Image => "IMAGE",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TEXT" => Ok(ContentType::Text),
            "IMAGE" => Ok(ContentType::Image),
            other => Err(ChatError::InvalidContentType(other.to_string())),
        }
    }
}

/// A registered user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password: String,
    pub username: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub profile_picture: Option<String>,
}

/// A named group of member users sharing a message history.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub title: String,
    pub members: Vec<User>,
    pub messages: Vec<Message>,
}

impl Conversation {
    /// Whether a user is among the members.
    pub fn has_member(&self, user_id: &UserId) -> bool {
        self.members.iter().any(|m| &m.id == user_id)
    }
}

/// A persisted chat message. Created once, never mutated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub sender_id: UserId,
    pub conversation_id: ConversationId,
    pub content: String,
    #[serde(rename = "contentType")]
    pub content_type: ContentType,
}

/// Input for creating a new user (before an id is assigned).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserInput {
    pub email: String,
    pub password: String,
    pub username: String,
    pub display_name: String,
}

/// Input for creating a new conversation.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConversationInput {
    pub title: String,
    pub member_ids: Vec<UserId>,
}

/// Input for sending a message to a conversation.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageInput {
    pub sender_id: UserId,
    pub conversation_id: ConversationId,
    pub content: String,
    pub content_type: ContentType,
}

impl SendMessageInput {
    pub fn new(
        sender_id: impl Into<UserId>,
        conversation_id: impl Into<ConversationId>,
        content: impl Into<String>,
        content_type: ContentType,
    ) -> Self {
        Self {
            sender_id: sender_id.into(),
            conversation_id: conversation_id.into(),
            content: content.into(),
            content_type,
        }
    }

    /// Shorthand for a plain text message.
    pub fn text(
        sender_id: impl Into<UserId>,
        conversation_id: impl Into<ConversationId>,
        content: impl Into<String>,
    ) -> Self {
        Self::new(sender_id, conversation_id, content, ContentType::Text)
    }
}
