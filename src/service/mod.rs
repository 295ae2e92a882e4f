//! High-level chat and user services.
//!
//! [`ChatService`] drives conversation, message and subscription flows on
//! top of a [`ChatStore`](crate::store::ChatStore) and a
//! [`SubscriptionRegistry`](crate::subscriptions::SubscriptionRegistry).
//! [`UserService`] covers account management and login against the same
//! store.

mod chat;
mod users;

pub use chat::{ChatService, ServiceConfig};
pub use users::UserService;
