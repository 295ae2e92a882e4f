//! Subscription-facing types: the delivery stream and registry configuration.

use crate::types::Message;
use crossbeam_channel::{Receiver, RecvError, RecvTimeoutError, TryRecvError};
use std::time::Duration;

/// Configuration for the subscription registry.
#[derive(Clone, Debug)]
pub struct RegistryConfig {
    /// Max buffered messages per subscriber before it is dropped as a slow
    /// consumer. Default: 256
    pub buffer_size: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self { buffer_size: 256 }
    }
}

/// Unique identifier for a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Consumer side of a subscription: a receive-only stream of messages.
///
/// The stream stays open until the subscription is cancelled or the registry
/// removes it (consumer gone, or queue overflow on a slow consumer).
/// Messages buffered before removal remain readable.
pub struct MessageStream {
    receiver: Receiver<Message>,
}

impl MessageStream {
    pub(crate) fn new(receiver: Receiver<Message>) -> Self {
        Self { receiver }
    }

    /// Receive the next message (blocking).
    pub fn recv(&self) -> Result<Message, RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message (non-blocking).
    pub fn try_recv(&self) -> Result<Message, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Message, RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}
