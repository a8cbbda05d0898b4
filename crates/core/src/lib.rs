//! `stockbook-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by every record crate
//! (no storage or presentation concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod location;

pub use entity::{Entity, find_by_id};
pub use error::{DomainError, DomainResult};
pub use id::{OwnerId, RecordId};
pub use location::Location;

/// Largest unit count accepted on any record. Keeps every amount derived
/// from a count (revenue, FIFO cost) well inside `Decimal` range.
pub const MAX_QUANTITY: i64 = 1_000_000_000;
