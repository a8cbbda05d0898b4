//! Ledger store boundary.
//!
//! The store owns durable copies of the four record collections for the
//! active owner, assigns record ids, and publishes a full-collection
//! snapshot after every successful write.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryLedgerStore;
pub use r#trait::{LedgerChange, LedgerStore, LedgerStoreError};
