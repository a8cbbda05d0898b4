use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockbook_inventory::{LedgerSnapshot, LocationStock, StockLevel, stock_by_location, stock_for};
use stockbook_products::ProductId;

/// One catalogue row on the stock page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockOverviewRow {
    pub product_id: ProductId,
    pub name: String,
    pub sell_price: Decimal,
    pub stock: StockLevel,
    pub by_location: LocationStock,
}

/// Stock of every current product, in catalogue order.
pub fn stock_overview(snapshot: &LedgerSnapshot) -> Vec<StockOverviewRow> {
    snapshot
        .products
        .iter()
        .map(|p| StockOverviewRow {
            product_id: p.id,
            name: p.name.clone(),
            sell_price: p.sell_price,
            stock: stock_for(snapshot, p.id),
            by_location: stock_by_location(snapshot, p.id),
        })
        .collect()
}
