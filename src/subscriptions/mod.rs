//! In-process subscriptions for live message delivery.
//!
//! This module is the fan-out core of the backend: it maintains the
//! conversation → subscribers mapping and bridges newly persisted messages
//! to every live subscriber of that conversation.
//!
//! Subscriptions support:
//! - Multiple independent subscribers per conversation
//! - Bounded per-subscriber buffers with slow-subscriber dropping
//! - Active, idempotent cancellation (removal happens at cancel time,
//!   not lazily on the next dispatch)
//!
//! # Example
//!
//! ```ignore
//! let registry = SubscriptionRegistry::new();
//!
//! // A transport adapter opens a live connection to a conversation
//! let (stream, cancel) = registry.subscribe(&conversation_id);
//!
//! // Elsewhere: a persisted message is handed to the dispatcher
//! registry.publish(&conversation_id, &message);
//!
//! // The adapter drains the stream and forwards to its peer
//! while let Ok(message) = stream.recv() {
//!     forward(message)?;
//! }
//!
//! // Connection ended: remove the registration
//! cancel.cancel();
//! ```

mod registry;
mod types;

pub use registry::{CancelHandle, SubscriptionRegistry};
pub use types::{MessageStream, RegistryConfig, SubscriptionId};
