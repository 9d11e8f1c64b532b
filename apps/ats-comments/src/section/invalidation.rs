//! Cross-section invalidation.
//!
//! A section that mutates a subject's records publishes an [`Invalidation`]; every
//! other section subscribed to the same subject reloads. Publishers never see
//! their own events.

use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::Subject;

const DEFAULT_CAPACITY: usize = 64;

/// "The records of `subject` changed", sent by section `origin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invalidation {
    pub subject: Subject,
    pub origin: Uuid,
}

/// Shared publish/subscribe channel. Cheap to clone; clones share the channel.
#[derive(Debug, Clone)]
pub struct InvalidationBus {
    sender: broadcast::Sender<Invalidation>,
}

impl Default for InvalidationBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl InvalidationBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Returns how many subscribers received the event.
    pub fn publish(&self, event: Invalidation) -> usize {
        match self.sender.send(event) {
            Ok(receivers) => {
                debug!(subject = ?event.subject, receivers, "Published invalidation");
                receivers
            }
            // No live subscribers is not an error.
            Err(_) => 0,
        }
    }

    /// Subscribes to events about `subject` that did not come from `origin`.
    pub fn subscribe(&self, subject: Subject, origin: Uuid) -> Subscription {
        Subscription {
            receiver: self.sender.subscribe(),
            subject,
            origin,
        }
    }
}

/// One section's view of the bus.
#[derive(Debug)]
pub struct Subscription {
    receiver: broadcast::Receiver<Invalidation>,
    subject: Subject,
    origin: Uuid,
}

impl Subscription {
    fn is_relevant(&self, event: &Invalidation) -> bool {
        event.subject == self.subject && event.origin != self.origin
    }

    /// Consumes every queued event without waiting.
    /// Returns `true` if any of them should trigger a reload.
    pub fn drain(&mut self) -> bool {
        let mut relevant = false;
        loop {
            match self.receiver.try_recv() {
                Ok(event) => relevant |= self.is_relevant(&event),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "Invalidation subscriber lagged; forcing reload");
                    relevant = true;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return relevant,
            }
        }
    }

    /// Waits for the next relevant event. Returns `false` once the bus is gone.
    pub async fn changed(&mut self) -> bool {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.is_relevant(&event) => return true,
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Invalidation subscriber lagged; forcing reload");
                    return true;
                }
                Err(RecvError::Closed) => return false,
            }
        }
    }
}
