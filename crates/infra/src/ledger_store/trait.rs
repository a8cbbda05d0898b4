use std::sync::Arc;

use thiserror::Error;

use stockbook_events::Subscription;
use stockbook_inventory::{LedgerSnapshot, NewTransfer, Transfer, TransferId};
use stockbook_products::{NewProduct, Product, ProductId};
use stockbook_purchasing::{NewRestock, Restock, RestockId};
use stockbook_sales::{NewSale, Sale, SaleId};

/// Ledger store operation error.
///
/// These are **collaborator** failures (session, storage) as opposed to
/// domain errors (validation, missing references in the cached snapshot).
#[derive(Debug, Error)]
pub enum LedgerStoreError {
    /// No owner is signed in; nothing can be read or written.
    #[error("no active owner session")]
    NoActiveOwner,

    #[error("{collection} record not found: {id}")]
    NotFound { collection: &'static str, id: String },

    /// Backend unreachable or internally broken.
    #[error("ledger store unavailable: {0}")]
    Unavailable(String),
}

impl LedgerStoreError {
    pub fn not_found(collection: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            collection,
            id: id.to_string(),
        }
    }
}

/// Change notification: the complete current contents of one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerChange {
    Products(Vec<Product>),
    Restocks(Vec<Restock>),
    Sales(Vec<Sale>),
    Transfers(Vec<Transfer>),
}

impl LedgerChange {
    /// Collection name, for logging.
    pub fn collection(&self) -> &'static str {
        match self {
            LedgerChange::Products(_) => "products",
            LedgerChange::Restocks(_) => "restocks",
            LedgerChange::Sales(_) => "sales",
            LedgerChange::Transfers(_) => "transfers",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            LedgerChange::Products(v) => v.len(),
            LedgerChange::Restocks(v) => v.len(),
            LedgerChange::Sales(v) => v.len(),
            LedgerChange::Transfers(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace the matching collection of `snapshot` wholesale.
    pub fn apply_to(self, snapshot: &mut LedgerSnapshot) {
        match self {
            LedgerChange::Products(v) => snapshot.products = v,
            LedgerChange::Restocks(v) => snapshot.restocks = v,
            LedgerChange::Sales(v) => snapshot.sales = v,
            LedgerChange::Transfers(v) => snapshot.transfers = v,
        }
    }
}

/// Durable, owner-scoped record collections.
///
/// ## Semantics
///
/// - `load_*` return a collection in the store's insertion order; the FIFO
///   engine uses that order to break date ties.
/// - `add_*` assign a fresh id and return it.
/// - `update_*` replace every field but the id; `NotFound` if the id is absent.
/// - `delete_*` remove one record. Deleting a product never touches the
///   restocks, sales or transfers referencing it.
/// - After each successful write the store publishes the affected
///   collection on every live [`Subscription`].
/// - Without an active owner session every call fails with
///   [`LedgerStoreError::NoActiveOwner`].
///
/// The store does not validate records; callers validate before writing.
#[async_trait::async_trait]
pub trait LedgerStore: Send + Sync {
    async fn load_products(&self) -> Result<Vec<Product>, LedgerStoreError>;
    async fn load_restocks(&self) -> Result<Vec<Restock>, LedgerStoreError>;
    async fn load_sales(&self) -> Result<Vec<Sale>, LedgerStoreError>;
    async fn load_transfers(&self) -> Result<Vec<Transfer>, LedgerStoreError>;

    async fn add_product(&self, product: NewProduct) -> Result<ProductId, LedgerStoreError>;
    async fn update_product(
        &self,
        id: ProductId,
        product: NewProduct,
    ) -> Result<(), LedgerStoreError>;
    async fn delete_product(&self, id: ProductId) -> Result<(), LedgerStoreError>;

    async fn add_restock(&self, restock: NewRestock) -> Result<RestockId, LedgerStoreError>;
    async fn update_restock(
        &self,
        id: RestockId,
        restock: NewRestock,
    ) -> Result<(), LedgerStoreError>;
    async fn delete_restock(&self, id: RestockId) -> Result<(), LedgerStoreError>;

    async fn add_sale(&self, sale: NewSale) -> Result<SaleId, LedgerStoreError>;
    async fn update_sale(&self, id: SaleId, sale: NewSale) -> Result<(), LedgerStoreError>;
    async fn delete_sale(&self, id: SaleId) -> Result<(), LedgerStoreError>;

    async fn add_transfer(&self, transfer: NewTransfer) -> Result<TransferId, LedgerStoreError>;
    async fn update_transfer(
        &self,
        id: TransferId,
        transfer: NewTransfer,
    ) -> Result<(), LedgerStoreError>;
    async fn delete_transfer(&self, id: TransferId) -> Result<(), LedgerStoreError>;

    /// Subscribe to change notifications. Drop the subscription to unsubscribe.
    fn subscribe(&self) -> Subscription<LedgerChange>;

    /// Delete all products, restocks and sales; transfers too when
    /// `include_transfers` is set.
    async fn clear_all(&self, include_transfers: bool) -> Result<(), LedgerStoreError>;

    /// Load every collection (initial hydration).
    async fn load_snapshot(&self) -> Result<LedgerSnapshot, LedgerStoreError> {
        Ok(LedgerSnapshot {
            products: self.load_products().await?,
            restocks: self.load_restocks().await?,
            sales: self.load_sales().await?,
            transfers: self.load_transfers().await?,
        })
    }
}

#[async_trait::async_trait]
impl<S> LedgerStore for Arc<S>
where
    S: LedgerStore + ?Sized,
{
    async fn load_products(&self) -> Result<Vec<Product>, LedgerStoreError> {
        (**self).load_products().await
    }

    async fn load_restocks(&self) -> Result<Vec<Restock>, LedgerStoreError> {
        (**self).load_restocks().await
    }

    async fn load_sales(&self) -> Result<Vec<Sale>, LedgerStoreError> {
        (**self).load_sales().await
    }

    async fn load_transfers(&self) -> Result<Vec<Transfer>, LedgerStoreError> {
        (**self).load_transfers().await
    }

    async fn add_product(&self, product: NewProduct) -> Result<ProductId, LedgerStoreError> {
        (**self).add_product(product).await
    }

    async fn update_product(
        &self,
        id: ProductId,
        product: NewProduct,
    ) -> Result<(), LedgerStoreError> {
        (**self).update_product(id, product).await
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), LedgerStoreError> {
        (**self).delete_product(id).await
    }

    async fn add_restock(&self, restock: NewRestock) -> Result<RestockId, LedgerStoreError> {
        (**self).add_restock(restock).await
    }

    async fn update_restock(
        &self,
        id: RestockId,
        restock: NewRestock,
    ) -> Result<(), LedgerStoreError> {
        (**self).update_restock(id, restock).await
    }

    async fn delete_restock(&self, id: RestockId) -> Result<(), LedgerStoreError> {
        (**self).delete_restock(id).await
    }

    async fn add_sale(&self, sale: NewSale) -> Result<SaleId, LedgerStoreError> {
        (**self).add_sale(sale).await
    }

    async fn update_sale(&self, id: SaleId, sale: NewSale) -> Result<(), LedgerStoreError> {
        (**self).update_sale(id, sale).await
    }

    async fn delete_sale(&self, id: SaleId) -> Result<(), LedgerStoreError> {
        (**self).delete_sale(id).await
    }

    async fn add_transfer(&self, transfer: NewTransfer) -> Result<TransferId, LedgerStoreError> {
        (**self).add_transfer(transfer).await
    }

    async fn update_transfer(
        &self,
        id: TransferId,
        transfer: NewTransfer,
    ) -> Result<(), LedgerStoreError> {
        (**self).update_transfer(id, transfer).await
    }

    async fn delete_transfer(&self, id: TransferId) -> Result<(), LedgerStoreError> {
        (**self).delete_transfer(id).await
    }

    fn subscribe(&self) -> Subscription<LedgerChange> {
        (**self).subscribe()
    }

    async fn clear_all(&self, include_transfers: bool) -> Result<(), LedgerStoreError> {
        (**self).clear_all(include_transfers).await
    }
}
