//! Infrastructure layer: ledger store, inventory service, config and wiring.

pub mod config;
pub mod context;
pub mod ledger_store;
pub mod service;

mod integration_tests;

pub use config::{Config, ConfigError};
pub use context::AppContext;
pub use ledger_store::{InMemoryLedgerStore, LedgerChange, LedgerStore, LedgerStoreError};
pub use service::{InventoryService, ServiceError, ServiceResult};
