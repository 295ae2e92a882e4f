//! In-memory store implementation.

use crate::error::{ChatError, Result};
use crate::store::ChatStore;
use crate::types::{Conversation, ConversationId, Message, MessageId, User, UserId};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Relational tables held in memory.
#[derive(Default)]
struct Tables {
    /// All users by id.
    users: HashMap<UserId, User>,

    /// Email to user id mapping (unique index).
    email_to_id: HashMap<String, UserId>,

    /// Conversation titles by id.
    conversations: HashMap<ConversationId, String>,

    /// Membership join set per conversation, in join order.
    members: HashMap<ConversationId, Vec<UserId>>,

    /// All messages by id.
    messages: HashMap<MessageId, Message>,

    /// Message log per conversation, in insertion order.
    logs: HashMap<ConversationId, Vec<MessageId>>,
}

impl Tables {
    /// Assemble a conversation view from its row, membership and log.
    fn compose_conversation(&self, id: &ConversationId) -> Option<Conversation> {
        let title = self.conversations.get(id)?.clone();

        let members = self
            .members
            .get(id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|uid| self.users.get(uid))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        let messages = self
            .logs
            .get(id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|mid| self.messages.get(mid))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        Some(Conversation {
            id: id.clone(),
            title,
            members,
            messages,
        })
    }
}

/// In-memory [`ChatStore`] with relational semantics.
pub struct MemoryStore {
    /// All tables behind one lock.
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }

    /// Number of stored users.
    pub fn user_count(&self) -> usize {
        self.tables.read().users.len()
    }

    /// Number of stored conversations.
    pub fn conversation_count(&self) -> usize {
        self.tables.read().conversations.len()
    }

    /// Number of stored messages.
    pub fn message_count(&self) -> usize {
        self.tables.read().messages.len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatStore for MemoryStore {
    fn create_user(&self, user: &User) -> Result<()> {
        let mut tables = self.tables.write();

        if tables.users.contains_key(&user.id) {
            return Err(ChatError::Store(format!("duplicate user id: {}", user.id)));
        }
        if tables.email_to_id.contains_key(&user.email) {
            return Err(ChatError::EmailTaken(user.email.clone()));
        }

        tables.email_to_id.insert(user.email.clone(), user.id.clone());
        tables.users.insert(user.id.clone(), user.clone());

        Ok(())
    }

    fn get_user(&self, id: &UserId) -> Result<User> {
        self.tables
            .read()
            .users
            .get(id)
            .cloned()
            .ok_or_else(|| ChatError::UserNotFound(id.clone()))
    }

    fn get_users_by_id(&self, ids: &[UserId]) -> Result<Vec<User>> {
        let tables = self.tables.read();

        let mut users: Vec<User> = Vec::new();
        for id in ids {
            if users.iter().any(|u| &u.id == id) {
                continue;
            }
            if let Some(user) = tables.users.get(id) {
                users.push(user.clone());
            }
        }

        Ok(users)
    }

    fn get_user_by_email(&self, email: &str) -> Result<User> {
        let tables = self.tables.read();

        tables
            .email_to_id
            .get(email)
            .and_then(|id| tables.users.get(id))
            .cloned()
            .ok_or_else(|| ChatError::UserNotFound(UserId::from(email)))
    }

    fn get_users(&self) -> Result<Vec<User>> {
        let mut users: Vec<User> = self.tables.read().users.values().cloned().collect();
        // Stable output order.
        users.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        Ok(users)
    }

    fn update_user(&self, user: &User) -> Result<()> {
        let mut tables = self.tables.write();

        let previous = tables
            .users
            .get(&user.id)
            .cloned()
            .ok_or_else(|| ChatError::UserNotFound(user.id.clone()))?;

        if user.email != previous.email {
            if tables.email_to_id.contains_key(&user.email) {
                return Err(ChatError::EmailTaken(user.email.clone()));
            }
            tables.email_to_id.remove(&previous.email);
            tables.email_to_id.insert(user.email.clone(), user.id.clone());
        }

        tables.users.insert(user.id.clone(), user.clone());

        Ok(())
    }

    fn delete_user(&self, id: &UserId) -> Result<()> {
        let mut tables = self.tables.write();

        let user = tables
            .users
            .remove(id)
            .ok_or_else(|| ChatError::UserNotFound(id.clone()))?;
        tables.email_to_id.remove(&user.email);

        // Unlink from every conversation; messages keep their sender id.
        for members in tables.members.values_mut() {
            members.retain(|m| m != id);
        }

        Ok(())
    }

    fn create_conversation(&self, conversation: &Conversation) -> Result<()> {
        let mut tables = self.tables.write();

        if tables.conversations.contains_key(&conversation.id) {
            return Err(ChatError::Store(format!(
                "duplicate conversation id: {}",
                conversation.id
            )));
        }

        // Link members that exist, once each.
        let mut members: Vec<UserId> = Vec::new();
        for user in &conversation.members {
            if tables.users.contains_key(&user.id) && !members.contains(&user.id) {
                members.push(user.id.clone());
            }
        }

        tables
            .conversations
            .insert(conversation.id.clone(), conversation.title.clone());
        tables.members.insert(conversation.id.clone(), members);
        tables.logs.insert(conversation.id.clone(), Vec::new());

        Ok(())
    }

    fn get_conversation(&self, id: &ConversationId) -> Result<Conversation> {
        self.tables
            .read()
            .compose_conversation(id)
            .ok_or_else(|| ChatError::ConversationNotFound(id.clone()))
    }

    fn conversations_for_user(&self, user_id: &UserId) -> Result<Vec<Conversation>> {
        let tables = self.tables.read();

        let mut ids: Vec<&ConversationId> = tables
            .members
            .iter()
            .filter(|(_, members)| members.contains(user_id))
            .map(|(id, _)| id)
            .collect();
        // Stable output order.
        ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));

        Ok(ids
            .into_iter()
            .filter_map(|id| tables.compose_conversation(id))
            .collect())
    }

    fn delete_conversation(&self, id: &ConversationId) -> Result<()> {
        let mut tables = self.tables.write();

        if tables.conversations.remove(id).is_none() {
            return Err(ChatError::ConversationNotFound(id.clone()));
        }

        tables.members.remove(id);
        if let Some(log) = tables.logs.remove(id) {
            for message_id in log {
                tables.messages.remove(&message_id);
            }
        }

        Ok(())
    }

    fn add_member(&self, conversation_id: &ConversationId, user_id: &UserId) -> Result<()> {
        let mut tables = self.tables.write();

        if !tables.conversations.contains_key(conversation_id) {
            return Err(ChatError::ConversationNotFound(conversation_id.clone()));
        }
        if !tables.users.contains_key(user_id) {
            return Err(ChatError::UserNotFound(user_id.clone()));
        }

        let members = tables.members.entry(conversation_id.clone()).or_default();
        if !members.contains(user_id) {
            members.push(user_id.clone());
        }

        Ok(())
    }

    fn remove_member(&self, conversation_id: &ConversationId, user_id: &UserId) -> Result<()> {
        let mut tables = self.tables.write();

        if !tables.conversations.contains_key(conversation_id) {
            return Err(ChatError::ConversationNotFound(conversation_id.clone()));
        }
        if !tables.users.contains_key(user_id) {
            return Err(ChatError::UserNotFound(user_id.clone()));
        }

        if let Some(members) = tables.members.get_mut(conversation_id) {
            members.retain(|m| m != user_id);
        }

        Ok(())
    }

    fn create_message(&self, message: &Message) -> Result<()> {
        let mut tables = self.tables.write();

        if !tables.conversations.contains_key(&message.conversation_id) {
            return Err(ChatError::ConversationNotFound(
                message.conversation_id.clone(),
            ));
        }
        if !tables.users.contains_key(&message.sender_id) {
            return Err(ChatError::UserNotFound(message.sender_id.clone()));
        }
        if tables.messages.contains_key(&message.id) {
            return Err(ChatError::Store(format!(
                "duplicate message id: {}",
                message.id
            )));
        }

        tables
            .logs
            .entry(message.conversation_id.clone())
            .or_default()
            .push(message.id.clone());
        tables.messages.insert(message.id.clone(), message.clone());

        Ok(())
    }

    fn get_message(&self, id: &MessageId) -> Result<Message> {
        self.tables
            .read()
            .messages
            .get(id)
            .cloned()
            .ok_or_else(|| ChatError::MessageNotFound(id.clone()))
    }
}
