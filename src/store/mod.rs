//! Persistence boundary for users, conversations, membership and messages.
//!
//! The core treats storage as an external collaborator behind the
//! [`ChatStore`] trait: simple create/read/delete operations, attempted
//! exactly once, with not-found conditions kept distinct from other
//! storage failures. Implementations handle their own concurrency.
//!
//! [`MemoryStore`] is the reference implementation shipped with the crate,
//! with relational semantics (unique email index, membership join set,
//! foreign-key checks on messages).

mod memory;

pub use memory::MemoryStore;

use crate::error::Result;
use crate::types::{Conversation, ConversationId, Message, MessageId, User, UserId};

/// Storage collaborator contract.
pub trait ChatStore: Send + Sync {
    // --- Users ---

    /// Persist a new user. Fails with `EmailTaken` if the email is already
    /// registered.
    fn create_user(&self, user: &User) -> Result<()>;

    /// Fetch a user by id. `UserNotFound` when absent.
    fn get_user(&self, id: &UserId) -> Result<User>;

    /// Fetch users by id, like a SQL `IN`: unknown ids are skipped and
    /// duplicates collapse to one, in first-occurrence order.
    fn get_users_by_id(&self, ids: &[UserId]) -> Result<Vec<User>>;

    /// Fetch a user by email. `UserNotFound` when absent.
    fn get_user_by_email(&self, email: &str) -> Result<User>;

    /// All users.
    fn get_users(&self) -> Result<Vec<User>>;

    /// Replace a stored user record. `UserNotFound` when absent,
    /// `EmailTaken` if the new email belongs to another user.
    fn update_user(&self, user: &User) -> Result<()>;

    /// Remove a user. `UserNotFound` when absent.
    fn delete_user(&self, id: &UserId) -> Result<()>;

    // --- Conversations ---

    /// Persist a new conversation together with its membership links.
    fn create_conversation(&self, conversation: &Conversation) -> Result<()>;

    /// Fetch a conversation with members and full message history.
    /// `ConversationNotFound` when absent.
    fn get_conversation(&self, id: &ConversationId) -> Result<Conversation>;

    /// All conversations a user belongs to.
    fn conversations_for_user(&self, user_id: &UserId) -> Result<Vec<Conversation>>;

    /// Remove a conversation, its membership links and its messages.
    /// `ConversationNotFound` when absent.
    fn delete_conversation(&self, id: &ConversationId) -> Result<()>;

    // --- Membership ---

    /// Link a user to a conversation. Idempotent: linking a present member
    /// is a no-op. Both sides must exist.
    fn add_member(&self, conversation_id: &ConversationId, user_id: &UserId) -> Result<()>;

    /// Unlink a user from a conversation. Idempotent: unlinking an absent
    /// member is a no-op. Both sides must exist.
    fn remove_member(&self, conversation_id: &ConversationId, user_id: &UserId) -> Result<()>;

    // --- Messages ---

    /// Persist a message. The conversation and the sender must exist.
    fn create_message(&self, message: &Message) -> Result<()>;

    /// Fetch a message by id. `MessageNotFound` when absent.
    fn get_message(&self, id: &MessageId) -> Result<Message>;
}
