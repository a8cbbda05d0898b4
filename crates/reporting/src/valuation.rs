//! Value of stock on hand at FIFO cost.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockbook_inventory::{LedgerSnapshot, fifo_layers, inventory_value};
use stockbook_products::ProductId;

/// Unsold units of one product and their FIFO value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationItem {
    pub product_id: ProductId,
    pub name: String,
    /// Units still sitting in restock layers (never negative).
    pub quantity: i64,
    pub value: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationSummary {
    pub items: Vec<ValuationItem>,
    pub total_quantity: i64,
    pub total_value: Decimal,
}

/// FIFO valuation of every current product.
pub fn valuation_summary(snapshot: &LedgerSnapshot) -> ValuationSummary {
    let items: Vec<ValuationItem> = snapshot
        .products
        .iter()
        .map(|p| ValuationItem {
            product_id: p.id,
            name: p.name.clone(),
            quantity: fifo_layers(snapshot, p.id, None)
                .iter()
                .map(|l| l.remaining.max(0))
                .sum(),
            value: inventory_value(snapshot, p.id),
        })
        .collect();

    ValuationSummary {
        total_quantity: items.iter().map(|i| i.quantity).sum(),
        total_value: items.iter().map(|i| i.value).sum(),
        items,
    }
}
