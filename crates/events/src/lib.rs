//! Change-notification mechanics.
//!
//! The ledger store publishes full-collection snapshots whenever a collection
//! changes; consumers hold a [`Subscription`] and replace their cached copy
//! wholesale. Dropping the subscription unsubscribes.

pub mod bus;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
