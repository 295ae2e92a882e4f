//! # Confab
//!
//! A multi-user chat backend core: users, conversations with many-to-many
//! membership, persisted messages, and an in-process publish/subscribe
//! engine that fans persisted messages out to live subscribers.
//!
//! ## Core Concepts
//!
//! - **Users**: Accounts with unique emails, managed by a [`UserService`]
//! - **Conversations**: Titled rooms carrying a membership set and an
//!   ordered message log
//! - **Messages**: Persisted to the store first, then fanned out
//! - **Subscriptions**: Bounded per-subscriber live streams with
//!   cancel-on-drop handles, tracked by a [`SubscriptionRegistry`]
//!
//! ## Example
//!
//! ```ignore
//! use confab::{
//!     ChatService, CreateConversationInput, CreateUserInput, MemoryStore, SendMessageInput,
//!     UserService,
//! };
//! use std::sync::Arc;
//!
//! let store = Arc::new(MemoryStore::new());
//! let users = UserService::new(store.clone());
//! let chat = ChatService::new(store);
//!
//! let alice = users.create_user(CreateUserInput {
//!     email: "alice@example.com".into(),
//!     password: "secret".into(),
//!     username: "alice".into(),
//!     display_name: "Alice".into(),
//! })?;
//! let room = chat.create_conversation(&alice.id, CreateConversationInput {
//!     title: "Team".into(),
//!     member_ids: vec![],
//! })?;
//!
//! // Live delivery
//! let (stream, cancel) = chat.subscribe(&room.id);
//! chat.send_message(SendMessageInput::text(alice.id, room.id.clone(), "hello"))?;
//! let live = stream.recv();
//! cancel.cancel();
//! ```

pub mod error;
pub mod service;
pub mod store;
pub mod subscriptions;
pub mod types;

// Re-exports
pub use error::{ChatError, Result};
pub use service::{ChatService, ServiceConfig, UserService};
pub use store::{ChatStore, MemoryStore};
pub use subscriptions::{
    CancelHandle, MessageStream, RegistryConfig, SubscriptionId, SubscriptionRegistry,
};
pub use types::*;
