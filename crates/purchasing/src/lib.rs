//! Purchasing: restock batches.
//!
//! A restock is one purchase of a product at a known total cost, split across
//! the two stock locations. Restocks are the FIFO layers the costing engine
//! consumes.

pub mod restock;

pub use restock::{NewRestock, Restock, RestockId};
