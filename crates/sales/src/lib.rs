//! Sales records.
//!
//! A sale is recorded as a stock count at one location: the units present
//! when the period started (`initial_at_location`) and the units left
//! (`remaining_at_location`). The difference is the quantity sold.

pub mod sale;

pub use sale::{NewSale, Sale, SaleId, SaleInput};
