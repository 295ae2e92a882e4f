//! Conversation and message service.

use crate::error::{ChatError, Result};
use crate::store::ChatStore;
use crate::subscriptions::{CancelHandle, MessageStream, RegistryConfig, SubscriptionRegistry};
use crate::types::{
    Conversation, ConversationId, CreateConversationInput, Message, MessageId, SendMessageInput,
    UserId,
};
use std::sync::Arc;
use uuid::Uuid;

/// Service configuration.
#[derive(Clone, Debug, Default)]
pub struct ServiceConfig {
    /// Live delivery registry settings.
    pub registry: RegistryConfig,
}

/// Conversation, message and subscription flows.
///
/// Messages are durable before they are live: `send_message` persists to
/// the store first and only then hands the message to the registry, so a
/// subscriber can never observe a message the store does not hold.
pub struct ChatService {
    /// Storage collaborator.
    store: Arc<dyn ChatStore>,

    /// Live delivery registry.
    registry: SubscriptionRegistry,
}

impl ChatService {
    /// Create a service with default settings.
    pub fn new(store: Arc<dyn ChatStore>) -> Self {
        Self::with_config(store, ServiceConfig::default())
    }

    /// Create a service with explicit settings.
    pub fn with_config(store: Arc<dyn ChatStore>, config: ServiceConfig) -> Self {
        Self {
            store,
            registry: SubscriptionRegistry::with_config(config.registry),
        }
    }

    // --- Conversation Operations ---

    /// Create a conversation on behalf of a requester.
    ///
    /// The requester must exist and always ends up a member, whether or
    /// not the input lists them. Unknown member ids are skipped rather
    /// than rejected, and duplicates collapse to one membership.
    pub fn create_conversation(
        &self,
        requester: &UserId,
        input: CreateConversationInput,
    ) -> Result<Conversation> {
        if input.title.is_empty() {
            return Err(ChatError::MissingField("title"));
        }

        let requester = self.store.get_user(requester)?;

        let mut members = self.store.get_users_by_id(&input.member_ids)?;
        if !members.iter().any(|m| m.id == requester.id) {
            members.push(requester);
        }

        let conversation = Conversation {
            id: ConversationId::from(Uuid::new_v4().to_string()),
            title: input.title,
            members,
            messages: Vec::new(),
        };
        self.store.create_conversation(&conversation)?;

        tracing::debug!(
            conversation = %conversation.id,
            members = conversation.members.len(),
            "conversation created"
        );
        Ok(conversation)
    }

    /// Fetch a conversation with members and full message history.
    pub fn get_conversation(&self, id: &ConversationId) -> Result<Conversation> {
        self.store.get_conversation(id)
    }

    /// All conversations a user belongs to.
    pub fn conversations_for_user(&self, user_id: &UserId) -> Result<Vec<Conversation>> {
        self.store.conversations_for_user(user_id)
    }

    /// Remove a conversation together with its history.
    ///
    /// Live subscribers are not touched; their streams simply go quiet.
    pub fn delete_conversation(&self, id: &ConversationId) -> Result<()> {
        self.store.delete_conversation(id)?;
        tracing::debug!(conversation = %id, "conversation deleted");
        Ok(())
    }

    // --- Membership Operations ---

    /// Add a user to a conversation. Adding a present member is a no-op
    /// and returns the conversation unchanged.
    pub fn add_member(
        &self,
        conversation_id: &ConversationId,
        user_id: &UserId,
    ) -> Result<Conversation> {
        let conversation = self.store.get_conversation(conversation_id)?;
        let user = self.store.get_user(user_id)?;

        if conversation.has_member(&user.id) {
            return Ok(conversation);
        }

        self.store.add_member(conversation_id, user_id)?;
        self.store.get_conversation(conversation_id)
    }

    /// Remove a user from a conversation. Removing an absent member is a
    /// no-op and returns the conversation unchanged.
    pub fn remove_member(
        &self,
        conversation_id: &ConversationId,
        user_id: &UserId,
    ) -> Result<Conversation> {
        let conversation = self.store.get_conversation(conversation_id)?;
        let user = self.store.get_user(user_id)?;

        if !conversation.has_member(&user.id) {
            return Ok(conversation);
        }

        self.store.remove_member(conversation_id, user_id)?;
        self.store.get_conversation(conversation_id)
    }

    // --- Message Operations ---

    /// Persist a message, then hand it to the registry for live delivery.
    ///
    /// Delivery is best effort and cannot fail the send: once stored, the
    /// message is the source of truth regardless of what any subscriber
    /// manages to receive.
    pub fn send_message(&self, input: SendMessageInput) -> Result<Message> {
        if input.sender_id.as_str().is_empty() {
            return Err(ChatError::MissingField("senderId"));
        }
        if input.conversation_id.as_str().is_empty() {
            return Err(ChatError::MissingField("conversationId"));
        }
        if input.content.is_empty() {
            return Err(ChatError::MissingField("content"));
        }

        let message = Message {
            id: MessageId::from(Uuid::new_v4().to_string()),
            sender_id: input.sender_id,
            conversation_id: input.conversation_id,
            content: input.content,
            content_type: input.content_type,
        };
        self.store.create_message(&message)?;

        // Store first, fan out second. A message is never announced
        // before it is durable.
        self.registry.publish(&message.conversation_id, &message);

        tracing::debug!(
            message = %message.id,
            conversation = %message.conversation_id,
            "message sent"
        );
        Ok(message)
    }

    // --- Subscription Operations ---

    /// Open a live subscription to a conversation.
    ///
    /// No existence or membership check is made; a stream on an unknown
    /// conversation is simply one that never yields. Dropping the handle
    /// cancels the subscription.
    pub fn subscribe(&self, conversation_id: &ConversationId) -> (MessageStream, CancelHandle) {
        self.registry.subscribe(conversation_id)
    }

    /// Number of live subscribers for a conversation.
    pub fn subscriber_count(&self, conversation_id: &ConversationId) -> usize {
        self.registry.subscriber_count(conversation_id)
    }
}
