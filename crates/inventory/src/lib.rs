//! Inventory: transfers, the ledger snapshot, FIFO costing and stock levels.
//!
//! Everything here is a pure function of a [`LedgerSnapshot`]: no IO, no
//! caching. Callers recompute from the latest snapshot whenever they need a
//! fresh answer.

pub mod costing;
pub mod snapshot;
pub mod stock;
pub mod transfer;

pub use costing::{FifoCost, FifoLayer, calculate_cost, fifo_layers, inventory_value};
pub use snapshot::LedgerSnapshot;
pub use stock::{
    LocationStock, StockLevel, last_sale_at_location, stock_by_location,
    stock_by_location_excluding, stock_for,
};
pub use transfer::{NewTransfer, Transfer, TransferId};
