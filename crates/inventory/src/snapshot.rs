//! Point-in-time view of all ledger collections.

use serde::{Deserialize, Serialize};

use stockbook_core::find_by_id;
use stockbook_products::{Product, ProductId};
use stockbook_purchasing::Restock;
use stockbook_sales::Sale;

use crate::transfer::Transfer;

/// The four ledger collections as last received from the store.
///
/// Order within each collection is the store's delivery order; the costing
/// engine relies on it to break date ties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub restocks: Vec<Restock>,
    #[serde(default)]
    pub sales: Vec<Sale>,
    #[serde(default)]
    pub transfers: Vec<Transfer>,
}

impl LedgerSnapshot {
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        find_by_id(&self.products, id)
    }

    pub fn restocks_of(&self, product_id: ProductId) -> impl Iterator<Item = &Restock> {
        self.restocks.iter().filter(move |r| r.product_id == product_id)
    }

    pub fn sales_of(&self, product_id: ProductId) -> impl Iterator<Item = &Sale> {
        self.sales.iter().filter(move |s| s.product_id == product_id)
    }

    pub fn transfers_of(&self, product_id: ProductId) -> impl Iterator<Item = &Transfer> {
        self.transfers.iter().filter(move |t| t.product_id == product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
            && self.restocks.is_empty()
            && self.sales.is_empty()
            && self.transfers.is_empty()
    }
}
