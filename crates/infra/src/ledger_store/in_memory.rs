use std::collections::HashMap;
use std::fmt::Display;
use std::sync::RwLock;

use stockbook_core::{Entity, OwnerId};
use stockbook_events::{EventBus, InMemoryEventBus, Subscription};
use stockbook_inventory::{LedgerSnapshot, NewTransfer, Transfer, TransferId};
use stockbook_products::{NewProduct, Product, ProductId};
use stockbook_purchasing::{NewRestock, Restock, RestockId};
use stockbook_sales::{NewSale, Sale, SaleId};

use super::r#trait::{LedgerChange, LedgerStore, LedgerStoreError};

/// In-memory ledger store, scoped per owner.
///
/// Intended for tests/dev and for the CLI (which seeds it from a JSON file).
/// Writes publish the affected collection on an [`InMemoryEventBus`] after
/// the lock is released.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    owner: RwLock<Option<OwnerId>>,
    ledgers: RwLock<HashMap<OwnerId, LedgerSnapshot>>,
    bus: InMemoryEventBus<LedgerChange>,
}

impl InMemoryLedgerStore {
    /// Store with no active session; every call fails until [`sign_in`].
    ///
    /// [`sign_in`]: Self::sign_in
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(owner: OwnerId) -> Self {
        let store = Self::new();
        store.sign_in(owner);
        store
    }

    /// Store whose `owner` ledger starts with the given records.
    pub fn seeded(owner: OwnerId, snapshot: LedgerSnapshot) -> Self {
        let store = Self::signed_in(owner);
        if let Ok(mut ledgers) = store.ledgers.write() {
            ledgers.insert(owner, snapshot);
        }
        store
    }

    pub fn sign_in(&self, owner: OwnerId) {
        if let Ok(mut current) = self.owner.write() {
            *current = Some(owner);
        }
        tracing::info!(%owner, "ledger session started");
    }

    pub fn sign_out(&self) {
        if let Ok(mut current) = self.owner.write() {
            *current = None;
        }
        tracing::info!("ledger session ended");
    }

    pub fn active_owner(&self) -> Option<OwnerId> {
        self.owner.read().ok().and_then(|o| *o)
    }

    fn require_owner(&self) -> Result<OwnerId, LedgerStoreError> {
        self.active_owner().ok_or(LedgerStoreError::NoActiveOwner)
    }

    fn read<T>(&self, f: impl FnOnce(&LedgerSnapshot) -> T) -> Result<T, LedgerStoreError> {
        let owner = self.require_owner()?;
        let ledgers = self
            .ledgers
            .read()
            .map_err(|_| LedgerStoreError::Unavailable("lock poisoned".to_string()))?;
        let empty = LedgerSnapshot::default();
        Ok(f(ledgers.get(&owner).unwrap_or(&empty)))
    }

    /// Run a write against the active owner's ledger, then publish the
    /// changes it reports.
    fn write<T>(
        &self,
        f: impl FnOnce(&mut LedgerSnapshot) -> Result<(T, Vec<LedgerChange>), LedgerStoreError>,
    ) -> Result<T, LedgerStoreError> {
        let owner = self.require_owner()?;
        let (value, changes) = {
            let mut ledgers = self
                .ledgers
                .write()
                .map_err(|_| LedgerStoreError::Unavailable("lock poisoned".to_string()))?;
            f(ledgers.entry(owner).or_default())?
        };

        for change in changes {
            let collection = change.collection();
            if let Err(err) = self.bus.publish(change) {
                // The write is committed; subscribers catch up on the next snapshot.
                tracing::warn!(collection, ?err, "failed to publish ledger change");
            }
        }

        Ok(value)
    }
}

fn replace<E>(
    records: &mut [E],
    collection: &'static str,
    record: E,
) -> Result<(), LedgerStoreError>
where
    E: Entity,
    E::Id: Display,
{
    let id = record.id();
    let slot = records
        .iter_mut()
        .find(|r| r.id() == id)
        .ok_or_else(|| LedgerStoreError::not_found(collection, id))?;
    *slot = record;
    Ok(())
}

fn remove<E>(
    records: &mut Vec<E>,
    collection: &'static str,
    id: E::Id,
) -> Result<(), LedgerStoreError>
where
    E: Entity,
    E::Id: Display,
{
    let pos = records
        .iter()
        .position(|r| r.id() == id)
        .ok_or_else(|| LedgerStoreError::not_found(collection, id))?;
    records.remove(pos);
    Ok(())
}

fn products_changed(ledger: &LedgerSnapshot) -> Vec<LedgerChange> {
    vec![LedgerChange::Products(ledger.products.clone())]
}

fn restocks_changed(ledger: &LedgerSnapshot) -> Vec<LedgerChange> {
    vec![LedgerChange::Restocks(ledger.restocks.clone())]
}

fn sales_changed(ledger: &LedgerSnapshot) -> Vec<LedgerChange> {
    vec![LedgerChange::Sales(ledger.sales.clone())]
}

fn transfers_changed(ledger: &LedgerSnapshot) -> Vec<LedgerChange> {
    vec![LedgerChange::Transfers(ledger.transfers.clone())]
}

#[async_trait::async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn load_products(&self) -> Result<Vec<Product>, LedgerStoreError> {
        self.read(|l| l.products.clone())
    }

    async fn load_restocks(&self) -> Result<Vec<Restock>, LedgerStoreError> {
        self.read(|l| l.restocks.clone())
    }

    async fn load_sales(&self) -> Result<Vec<Sale>, LedgerStoreError> {
        self.read(|l| l.sales.clone())
    }

    async fn load_transfers(&self) -> Result<Vec<Transfer>, LedgerStoreError> {
        self.read(|l| l.transfers.clone())
    }

    async fn add_product(&self, product: NewProduct) -> Result<ProductId, LedgerStoreError> {
        self.write(|l| {
            let id = ProductId::generate();
            l.products.push(product.into_product(id));
            Ok((id, products_changed(l)))
        })
    }

    async fn update_product(
        &self,
        id: ProductId,
        product: NewProduct,
    ) -> Result<(), LedgerStoreError> {
        self.write(|l| {
            replace(&mut l.products, "products", product.into_product(id))?;
            Ok(((), products_changed(l)))
        })
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), LedgerStoreError> {
        self.write(|l| {
            remove(&mut l.products, "products", id)?;
            Ok(((), products_changed(l)))
        })
    }

    async fn add_restock(&self, restock: NewRestock) -> Result<RestockId, LedgerStoreError> {
        self.write(|l| {
            let id = RestockId::generate();
            l.restocks.push(restock.into_restock(id));
            Ok((id, restocks_changed(l)))
        })
    }

    async fn update_restock(
        &self,
        id: RestockId,
        restock: NewRestock,
    ) -> Result<(), LedgerStoreError> {
        self.write(|l| {
            replace(&mut l.restocks, "restocks", restock.into_restock(id))?;
            Ok(((), restocks_changed(l)))
        })
    }

    async fn delete_restock(&self, id: RestockId) -> Result<(), LedgerStoreError> {
        self.write(|l| {
            remove(&mut l.restocks, "restocks", id)?;
            Ok(((), restocks_changed(l)))
        })
    }

    async fn add_sale(&self, sale: NewSale) -> Result<SaleId, LedgerStoreError> {
        self.write(|l| {
            let id = SaleId::generate();
            l.sales.push(sale.into_sale(id));
            Ok((id, sales_changed(l)))
        })
    }

    async fn update_sale(&self, id: SaleId, sale: NewSale) -> Result<(), LedgerStoreError> {
        self.write(|l| {
            replace(&mut l.sales, "sales", sale.into_sale(id))?;
            Ok(((), sales_changed(l)))
        })
    }

    async fn delete_sale(&self, id: SaleId) -> Result<(), LedgerStoreError> {
        self.write(|l| {
            remove(&mut l.sales, "sales", id)?;
            Ok(((), sales_changed(l)))
        })
    }

    async fn add_transfer(&self, transfer: NewTransfer) -> Result<TransferId, LedgerStoreError> {
        self.write(|l| {
            let id = TransferId::generate();
            l.transfers.push(transfer.into_transfer(id));
            Ok((id, transfers_changed(l)))
        })
    }

    async fn update_transfer(
        &self,
        id: TransferId,
        transfer: NewTransfer,
    ) -> Result<(), LedgerStoreError> {
        self.write(|l| {
            replace(&mut l.transfers, "transfers", transfer.into_transfer(id))?;
            Ok(((), transfers_changed(l)))
        })
    }

    async fn delete_transfer(&self, id: TransferId) -> Result<(), LedgerStoreError> {
        self.write(|l| {
            remove(&mut l.transfers, "transfers", id)?;
            Ok(((), transfers_changed(l)))
        })
    }

    fn subscribe(&self) -> Subscription<LedgerChange> {
        self.bus.subscribe()
    }

    async fn clear_all(&self, include_transfers: bool) -> Result<(), LedgerStoreError> {
        self.write(|l| {
            l.products.clear();
            l.restocks.clear();
            l.sales.clear();
            let mut changes = vec![
                LedgerChange::Products(Vec::new()),
                LedgerChange::Restocks(Vec::new()),
                LedgerChange::Sales(Vec::new()),
            ];
            if include_transfers {
                l.transfers.clear();
                changes.push(LedgerChange::Transfers(Vec::new()));
            }
            Ok(((), changes))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use stockbook_core::Location;

    fn test_owner() -> OwnerId {
        OwnerId::new()
    }

    fn test_transfer(product_id: ProductId) -> NewTransfer {
        NewTransfer {
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            product_id,
            from_location: Location::Sekret,
            to_location: Location::Kelas,
            quantity: 2,
            note: String::new(),
        }
    }

    #[tokio::test]
    async fn calls_fail_without_session() {
        let store = InMemoryLedgerStore::new();

        let err = store.load_products().await.unwrap_err();
        assert!(matches!(err, LedgerStoreError::NoActiveOwner));

        let err = store
            .add_product(NewProduct::new("Pulpen", dec!(2000)))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerStoreError::NoActiveOwner));
    }

    #[tokio::test]
    async fn owners_see_only_their_own_records() {
        let alice = test_owner();
        let bob = test_owner();
        let store = InMemoryLedgerStore::signed_in(alice);
        store.add_product(NewProduct::new("Pulpen", dec!(2000))).await.unwrap();

        store.sign_in(bob);
        assert!(store.load_products().await.unwrap().is_empty());

        store.sign_in(alice);
        assert_eq!(store.load_products().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn writes_publish_full_collection() {
        let store = InMemoryLedgerStore::signed_in(test_owner());
        let changes = store.subscribe();

        let first = store.add_product(NewProduct::new("Pulpen", dec!(2000))).await.unwrap();
        store.add_product(NewProduct::new("Buku", dec!(5000))).await.unwrap();
        store.update_product(first, NewProduct::new("Pulpen Biru", dec!(2500))).await.unwrap();

        let mut last = None;
        let mut seen = 0;
        while let Some(change) = changes.try_next() {
            seen += 1;
            last = Some(change);
        }
        assert_eq!(seen, 3);
        match last {
            Some(LedgerChange::Products(products)) => {
                assert_eq!(products.len(), 2);
                assert_eq!(products[0].name, "Pulpen Biru");
                assert_eq!(products[0].id, first);
            }
            other => panic!("expected products snapshot, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn update_of_missing_record_is_not_found() {
        let store = InMemoryLedgerStore::signed_in(test_owner());
        let err = store
            .update_product(ProductId::generate(), NewProduct::new("X", dec!(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerStoreError::NotFound { collection: "products", .. }));

        let err = store.delete_sale(SaleId::generate()).await.unwrap_err();
        assert!(matches!(err, LedgerStoreError::NotFound { collection: "sales", .. }));
    }

    #[tokio::test]
    async fn deleting_product_keeps_dependent_records() {
        let store = InMemoryLedgerStore::signed_in(test_owner());
        let product_id = store.add_product(NewProduct::new("Map", dec!(1500))).await.unwrap();
        store.add_transfer(test_transfer(product_id)).await.unwrap();

        store.delete_product(product_id).await.unwrap();

        assert!(store.load_products().await.unwrap().is_empty());
        assert_eq!(store.load_transfers().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn clear_all_honours_transfer_policy() {
        let store = InMemoryLedgerStore::signed_in(test_owner());
        let product_id = store.add_product(NewProduct::new("Map", dec!(1500))).await.unwrap();
        store.add_transfer(test_transfer(product_id)).await.unwrap();

        store.clear_all(false).await.unwrap();
        let snapshot = store.load_snapshot().await.unwrap();
        assert!(snapshot.products.is_empty());
        assert_eq!(snapshot.transfers.len(), 1);

        store.clear_all(true).await.unwrap();
        assert!(store.load_snapshot().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn seeded_store_serves_the_seed() {
        let owner = test_owner();
        let product = NewProduct::new("Pulpen", dec!(2000)).into_product(ProductId::generate());
        let seed = LedgerSnapshot {
            products: vec![product.clone()],
            ..LedgerSnapshot::default()
        };

        let store = InMemoryLedgerStore::seeded(owner, seed);
        assert_eq!(store.load_products().await.unwrap(), vec![product]);
    }
}
