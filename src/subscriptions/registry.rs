//! Subscription registry and message fan-out.

use crate::types::{ConversationId, Message};
use crossbeam_channel::{bounded, Sender, TrySendError};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use super::types::{MessageStream, RegistryConfig, SubscriptionId};

/// One live subscriber slot under a conversation key.
struct Subscriber {
    id: SubscriptionId,
    sender: Sender<Message>,
}

/// Registry state shared with cancel handles.
struct Shared {
    /// Conversation id → subscribers, in registration order. One coarse lock
    /// covers every append, removal, and full dispatch pass.
    entries: Mutex<HashMap<ConversationId, Vec<Subscriber>>>,

    /// Counter for generating subscription IDs.
    next_id: AtomicU64,

    /// Configuration.
    config: RegistryConfig,
}

impl Shared {
    /// Remove one subscription. Returns false if it was already gone.
    fn remove(&self, conversation_id: &ConversationId, id: SubscriptionId) -> bool {
        let mut entries = self.entries.lock();
        let Some(subscribers) = entries.get_mut(conversation_id) else {
            return false;
        };

        let before = subscribers.len();
        subscribers.retain(|s| s.id != id);
        let removed = subscribers.len() < before;

        if subscribers.is_empty() {
            entries.remove(conversation_id);
        }
        removed
    }
}

/// Maintains the conversation → subscribers mapping and fans published
/// messages out to every live subscriber of a conversation.
///
/// Constructed once at service start and shared via `Arc`; there is no
/// ambient global state.
pub struct SubscriptionRegistry {
    shared: Arc<Shared>,
}

impl SubscriptionRegistry {
    /// Create a registry with default configuration.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a registry with custom configuration.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                entries: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(1),
                config,
            }),
        }
    }

    /// Register a new subscription for a conversation.
    ///
    /// Always succeeds; the conversation is not required to exist (publishing
    /// to a conversation nobody subscribed to is a no-op). Subscriptions are
    /// not deduplicated: the same caller may hold several for one
    /// conversation.
    pub fn subscribe(&self, conversation_id: &ConversationId) -> (MessageStream, CancelHandle) {
        let id = SubscriptionId(self.shared.next_id.fetch_add(1, Ordering::SeqCst));
        let (sender, receiver) = bounded(self.shared.config.buffer_size);

        self.shared
            .entries
            .lock()
            .entry(conversation_id.clone())
            .or_default()
            .push(Subscriber { id, sender });

        tracing::debug!(
            conversation = %conversation_id,
            subscription = id.0,
            "subscriber registered"
        );

        let cancel = CancelHandle {
            inner: Arc::new(CancelInner {
                shared: Arc::downgrade(&self.shared),
                conversation_id: conversation_id.clone(),
                id,
                cancelled: AtomicBool::new(false),
            }),
        };

        (MessageStream::new(receiver), cancel)
    }

    /// Deliver a message to every subscriber of its conversation.
    ///
    /// Best-effort: a missing conversation key is a no-op and per-subscriber
    /// failures never surface to the caller. Each subscriber has its own
    /// bounded queue, so one slow consumer cannot stall its peers; a
    /// subscriber whose consumer is gone, or whose queue is full, is removed
    /// during the pass and its stream closes.
    ///
    /// The pass runs under the registry lock, so publishes to one
    /// conversation serialize and per-subscriber delivery order matches
    /// publish order.
    pub fn publish(&self, conversation_id: &ConversationId, message: &Message) {
        let mut entries = self.shared.entries.lock();
        let Some(subscribers) = entries.get_mut(conversation_id) else {
            return;
        };

        subscribers.retain(|subscriber| match subscriber.sender.try_send(message.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!(
                    conversation = %conversation_id,
                    subscription = subscriber.id.0,
                    "delivery queue full, dropping slow subscriber"
                );
                false
            }
            Err(TrySendError::Disconnected(_)) => {
                tracing::debug!(
                    conversation = %conversation_id,
                    subscription = subscriber.id.0,
                    "consumer gone, dropping subscriber"
                );
                false
            }
        });

        if subscribers.is_empty() {
            entries.remove(conversation_id);
        }
    }

    /// Number of live subscribers for a conversation.
    pub fn subscriber_count(&self, conversation_id: &ConversationId) -> usize {
        self.shared
            .entries
            .lock()
            .get(conversation_id)
            .map_or(0, Vec::len)
    }

    /// Number of conversations with at least one live subscriber.
    pub fn conversation_count(&self) -> usize {
        self.shared.entries.lock().len()
    }
}

impl Default for SubscriptionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Producer-facing control used to mark a subscription as no longer wanting
/// delivery.
///
/// Cancellation actively removes the subscription from the registry, so a
/// cancelled subscription is never re-scanned by future dispatches.
/// `cancel` is idempotent, and the last clone of a handle cancels on drop,
/// so a transport adapter that unwinds still cleans up its registration.
#[derive(Clone)]
pub struct CancelHandle {
    inner: Arc<CancelInner>,
}

struct CancelInner {
    shared: Weak<Shared>,
    conversation_id: ConversationId,
    id: SubscriptionId,
    cancelled: AtomicBool,
}

impl CancelInner {
    fn cancel(&self) {
        if self.cancelled.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(shared) = self.shared.upgrade() {
            if shared.remove(&self.conversation_id, self.id) {
                tracing::debug!(
                    conversation = %self.conversation_id,
                    subscription = self.id.0,
                    "subscription cancelled"
                );
            }
        }
    }
}

impl Drop for CancelInner {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl CancelHandle {
    /// Identifier of the subscription this handle controls, matching the
    /// id in registry log lines.
    pub fn id(&self) -> SubscriptionId {
        self.inner.id
    }

    /// Cancel the subscription, synchronously removing it from the registry.
    /// Safe to call more than once.
    pub fn cancel(&self) {
        self.inner.cancel();
    }

    /// Whether cancellation has been signalled on this subscription.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }
}
