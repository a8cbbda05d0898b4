//! Product catalogue records.
//!
//! Products are referenced softly by restocks, sales and transfers: deleting a
//! product never removes dependent ledger records.

pub mod product;

pub use product::{DELETED_PRODUCT_LABEL, NewProduct, Product, ProductId, display_name};
