//! Inventory facade: the cached ledger plus validated writes.
//!
//! The service never edits its cache in response to its own writes. A write
//! goes to the store, the store publishes the new collection, and the cache
//! catches up in [`InventoryService::process_changes`]. A failed store call
//! therefore leaves the cache exactly as it was.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use stockbook_core::{DomainError, Location, find_by_id};
use stockbook_events::Subscription;
use stockbook_inventory::{
    self as inventory, FifoCost, LedgerSnapshot, LocationStock, NewTransfer, StockLevel, Transfer,
    TransferId,
};
use stockbook_products::{self as products, NewProduct, Product, ProductId};
use stockbook_purchasing::{NewRestock, Restock, RestockId};
use stockbook_reporting::{
    self as reporting, DashboardStats, SalesReport, StockOverviewRow, ValuationSummary,
};
use stockbook_sales::{NewSale, Sale, SaleId, SaleInput};

use crate::ledger_store::{LedgerChange, LedgerStore, LedgerStoreError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] LedgerStoreError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

pub struct InventoryService<S: LedgerStore> {
    store: S,
    cache: LedgerSnapshot,
    changes: Subscription<LedgerChange>,
    clear_includes_transfers: bool,
}

impl<S: LedgerStore> InventoryService<S> {
    /// Subscribe to `store`, then hydrate the cache from it.
    ///
    /// Subscribing first means a write landing between the two steps is
    /// replayed by the next [`process_changes`](Self::process_changes).
    pub async fn connect(store: S) -> ServiceResult<Self> {
        let changes = store.subscribe();
        let cache = store.load_snapshot().await?;
        tracing::info!(
            products = cache.products.len(),
            restocks = cache.restocks.len(),
            sales = cache.sales.len(),
            transfers = cache.transfers.len(),
            "inventory service connected"
        );

        Ok(Self {
            store,
            cache,
            changes,
            clear_includes_transfers: true,
        })
    }

    /// Whether [`clear_all`](Self::clear_all) also deletes transfers.
    pub fn with_clear_policy(mut self, include_transfers: bool) -> Self {
        self.clear_includes_transfers = include_transfers;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn snapshot(&self) -> &LedgerSnapshot {
        &self.cache
    }

    /// Replace one cached collection wholesale.
    pub fn apply_change(&mut self, change: LedgerChange) {
        tracing::debug!(
            collection = change.collection(),
            len = change.len(),
            "applying ledger change"
        );
        change.apply_to(&mut self.cache);
    }

    /// Drain pending change notifications into the cache. Returns how many
    /// were applied.
    pub fn process_changes(&mut self) -> usize {
        let mut applied = 0;
        while let Some(change) = self.changes.try_next() {
            self.apply_change(change);
            applied += 1;
        }
        applied
    }

    /// Reload every collection from the store.
    pub async fn refresh(&mut self) -> ServiceResult<()> {
        let snapshot = self.store.load_snapshot().await?;
        // Anything queued before the reload is already reflected in it.
        while self.changes.try_next().is_some() {}
        self.cache = snapshot;
        Ok(())
    }

    // --- products ---

    pub fn products(&self) -> &[Product] {
        &self.cache.products
    }

    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.cache.product(id)
    }

    /// Product name, or a placeholder for deleted products.
    pub fn product_name(&self, id: ProductId) -> &str {
        products::display_name(&self.cache.products, id)
    }

    pub async fn add_product(&self, product: NewProduct) -> ServiceResult<ProductId> {
        product.validate().inspect_err(|err| warn_rejected("product", err))?;
        let id = self.store.add_product(product).await?;
        tracing::info!(%id, "product added");
        Ok(id)
    }

    pub async fn update_product(&self, id: ProductId, product: NewProduct) -> ServiceResult<()> {
        product.validate().inspect_err(|err| warn_rejected("product", err))?;
        self.store.update_product(id, product).await?;
        tracing::info!(%id, "product updated");
        Ok(())
    }

    /// Delete a product. Its restocks, sales and transfers are kept.
    pub async fn delete_product(&self, id: ProductId) -> ServiceResult<()> {
        self.store.delete_product(id).await?;
        tracing::info!(%id, "product deleted");
        Ok(())
    }

    // --- restocks ---

    pub fn restocks(&self) -> &[Restock] {
        &self.cache.restocks
    }

    pub async fn add_restock(&self, restock: NewRestock) -> ServiceResult<RestockId> {
        self.check_restock(&restock)?;
        let id = self.store.add_restock(restock).await?;
        tracing::info!(%id, "restock added");
        Ok(id)
    }

    pub async fn update_restock(&self, id: RestockId, restock: NewRestock) -> ServiceResult<()> {
        if find_by_id(&self.cache.restocks, id).is_none() {
            return Err(DomainError::not_found(format!("restock {id}")).into());
        }
        self.check_restock(&restock)?;
        self.store.update_restock(id, restock).await?;
        tracing::info!(%id, "restock updated");
        Ok(())
    }

    pub async fn delete_restock(&self, id: RestockId) -> ServiceResult<()> {
        self.store.delete_restock(id).await?;
        tracing::info!(%id, "restock deleted");
        Ok(())
    }

    fn check_restock(&self, restock: &NewRestock) -> ServiceResult<()> {
        restock.validate().inspect_err(|err| warn_rejected("restock", err))?;
        self.require_product(restock.product_id)?;
        Ok(())
    }

    // --- sales ---

    pub fn sales(&self) -> &[Sale] {
        &self.cache.sales
    }

    /// Record a sale, pricing it at the product's current sell price and
    /// costing it FIFO against the cached ledger.
    pub async fn add_sale(&self, input: SaleInput) -> ServiceResult<SaleId> {
        let sale = self.price_sale(input, None)?;
        let id = self.store.add_sale(sale).await?;
        tracing::info!(%id, "sale added");
        Ok(id)
    }

    /// Replace a sale, re-costing it as if it had never been recorded.
    pub async fn update_sale(&self, id: SaleId, input: SaleInput) -> ServiceResult<()> {
        if find_by_id(&self.cache.sales, id).is_none() {
            return Err(DomainError::not_found(format!("sale {id}")).into());
        }
        let sale = self.price_sale(input, Some(id))?;
        self.store.update_sale(id, sale).await?;
        tracing::info!(%id, "sale updated");
        Ok(())
    }

    pub async fn delete_sale(&self, id: SaleId) -> ServiceResult<()> {
        self.store.delete_sale(id).await?;
        tracing::info!(%id, "sale deleted");
        Ok(())
    }

    fn price_sale(
        &self,
        input: SaleInput,
        exclude_sale: Option<SaleId>,
    ) -> ServiceResult<NewSale> {
        input.validate().inspect_err(|err| warn_rejected("sale", err))?;
        let product = self.require_product(input.product_id)?;

        let quantity = input.quantity();
        let cost = inventory::calculate_cost(&self.cache, product.id, quantity, exclude_sale);
        if !cost.fully_covered {
            tracing::warn!(
                product_id = %product.id,
                quantity,
                "sale exceeds FIFO stock; uncovered units carry no cost"
            );
        }

        let sale = input
            .price(product.sell_price, cost.total_cost)
            .inspect_err(|err| warn_rejected("sale", err))?;
        Ok(sale)
    }

    // --- transfers ---

    pub fn transfers(&self) -> &[Transfer] {
        &self.cache.transfers
    }

    pub async fn add_transfer(&self, transfer: NewTransfer) -> ServiceResult<TransferId> {
        self.check_transfer(&transfer, None)?;
        let id = self.store.add_transfer(transfer).await?;
        tracing::info!(%id, "transfer added");
        Ok(id)
    }

    pub async fn update_transfer(
        &self,
        id: TransferId,
        transfer: NewTransfer,
    ) -> ServiceResult<()> {
        if find_by_id(&self.cache.transfers, id).is_none() {
            return Err(DomainError::not_found(format!("transfer {id}")).into());
        }
        self.check_transfer(&transfer, Some(id))?;
        self.store.update_transfer(id, transfer).await?;
        tracing::info!(%id, "transfer updated");
        Ok(())
    }

    pub async fn delete_transfer(&self, id: TransferId) -> ServiceResult<()> {
        self.store.delete_transfer(id).await?;
        tracing::info!(%id, "transfer deleted");
        Ok(())
    }

    /// The source location must hold at least `quantity` units, not counting
    /// the transfer being replaced.
    fn check_transfer(
        &self,
        transfer: &NewTransfer,
        replacing: Option<TransferId>,
    ) -> ServiceResult<()> {
        transfer.validate().inspect_err(|err| warn_rejected("transfer", err))?;
        self.require_product(transfer.product_id)?;

        let available =
            inventory::stock_by_location_excluding(&self.cache, transfer.product_id, replacing)
                .at(transfer.from_location);
        if transfer.quantity > available {
            let err = DomainError::validation(format!(
                "cannot move {} units from {}: only {} available",
                transfer.quantity,
                transfer.from_location.display_name(),
                available
            ));
            warn_rejected("transfer", &err);
            return Err(err.into());
        }
        Ok(())
    }

    // --- queries ---

    pub fn calculate_cost(
        &self,
        product_id: ProductId,
        quantity: i64,
        exclude_sale: Option<SaleId>,
    ) -> FifoCost {
        inventory::calculate_cost(&self.cache, product_id, quantity, exclude_sale)
    }

    pub fn stock_for(&self, product_id: ProductId) -> StockLevel {
        inventory::stock_for(&self.cache, product_id)
    }

    pub fn stock_by_location(&self, product_id: ProductId) -> LocationStock {
        inventory::stock_by_location(&self.cache, product_id)
    }

    pub fn inventory_value(&self, product_id: ProductId) -> Decimal {
        inventory::inventory_value(&self.cache, product_id)
    }

    pub fn last_sale_at_location(
        &self,
        product_id: ProductId,
        location: Location,
    ) -> Option<&Sale> {
        inventory::last_sale_at_location(&self.cache, product_id, location)
    }

    pub fn dashboard_stats(&self) -> DashboardStats {
        reporting::dashboard_stats(&self.cache)
    }

    pub fn report_by_range(&self, start: NaiveDate, end: NaiveDate) -> SalesReport {
        reporting::report_by_range(&self.cache, start, end)
    }

    pub fn stock_overview(&self) -> Vec<StockOverviewRow> {
        reporting::stock_overview(&self.cache)
    }

    pub fn valuation_summary(&self) -> ValuationSummary {
        reporting::valuation_summary(&self.cache)
    }

    /// Wipe the owner's ledger. Transfers go too unless the service was
    /// configured otherwise.
    pub async fn clear_all(&self) -> ServiceResult<()> {
        self.store.clear_all(self.clear_includes_transfers).await?;
        tracing::info!(include_transfers = self.clear_includes_transfers, "ledger cleared");
        Ok(())
    }

    fn require_product(&self, id: ProductId) -> ServiceResult<&Product> {
        self.cache
            .product(id)
            .ok_or_else(|| DomainError::not_found(format!("product {id}")).into())
    }
}

fn warn_rejected(record: &'static str, err: &DomainError) {
    tracing::warn!(record, error = %err, "rejected invalid record");
}
