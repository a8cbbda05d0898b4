//! Application wiring: configuration plus a connected inventory service.

use crate::config::Config;
use crate::ledger_store::LedgerStore;
use crate::service::{InventoryService, ServiceResult};

/// Everything a front end needs, built once at startup and passed around
/// explicitly.
pub struct AppContext<S: LedgerStore> {
    config: Config,
    service: InventoryService<S>,
}

impl<S: LedgerStore> AppContext<S> {
    pub async fn bootstrap(config: Config, store: S) -> ServiceResult<Self> {
        let service = InventoryService::connect(store)
            .await?
            .with_clear_policy(config.clear_includes_transfers);
        tracing::info!(owner_id = %config.owner_id, "application context ready");
        Ok(Self { config, service })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn service(&self) -> &InventoryService<S> {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut InventoryService<S> {
        &mut self.service
    }
}
