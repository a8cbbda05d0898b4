//! Publish/subscribe abstraction for change notifications (mechanics only).
//!
//! Messages are snapshots, not diffs: a consumer that misses one message is
//! brought up to date by the next message for the same collection.
//!
//! - **Transport-agnostic**: in-memory channels here; a remote backend can
//!   implement the same trait.
//! - **Broadcast**: each subscriber receives a copy of every published message.
//! - **No persistence**: the store is the source of truth; the bus only
//!   distributes.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, TryRecvError};

/// A subscription to a message stream.
///
/// ```ignore
/// let subscription = bus.subscribe();
/// while let Some(change) = subscription.try_next() {
///     apply(change);
/// }
/// ```
///
/// Subscriptions are meant for single-threaded consumption.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Next pending message, or `None` when nothing is queued (or the bus is gone).
    pub fn try_next(&self) -> Option<M> {
        match self.receiver.try_recv() {
            Ok(message) => Some(message),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                tracing::debug!("subscription disconnected from bus");
                None
            }
        }
    }
}

/// Domain-agnostic pub/sub bus.
///
/// `publish()` can fail (e.g. poisoned lock, remote transport down). Since the
/// store has already committed the write, a failed publish only delays
/// consumers until the next snapshot.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
