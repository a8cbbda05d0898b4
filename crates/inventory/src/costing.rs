//! FIFO cost of goods sold.
//!
//! Restock batches form layers ordered by purchase date. Every prior sale of
//! the product is replayed against those layers oldest-first, then the
//! requested quantity is priced against whatever is left.
//!
//! The replay is O(restocks × sales) per call. It runs once per sale
//! mutation, never per query.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockbook_products::ProductId;
use stockbook_purchasing::RestockId;
use stockbook_sales::SaleId;

use crate::snapshot::LedgerSnapshot;

/// Result of pricing a quantity against the FIFO layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FifoCost {
    pub total_cost: Decimal,
    /// `false` when the quantity exceeded available stock. The uncovered
    /// units contribute no cost.
    pub fully_covered: bool,
}

/// One restock batch with the units not yet consumed by sales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FifoLayer {
    pub restock_id: RestockId,
    pub buy_price: Decimal,
    pub remaining: i64,
}

/// Layers after replaying every sale of `product_id` (except `exclude_sale`).
///
/// Restocks and sales are ordered by date with a stable sort, so records on
/// the same date keep the snapshot's order.
pub fn fifo_layers(
    snapshot: &LedgerSnapshot,
    product_id: ProductId,
    exclude_sale: Option<SaleId>,
) -> Vec<FifoLayer> {
    let mut restocks: Vec<_> = snapshot.restocks_of(product_id).collect();
    restocks.sort_by_key(|r| r.date);

    let mut sales: Vec<_> = snapshot
        .sales_of(product_id)
        .filter(|s| Some(s.id) != exclude_sale)
        .collect();
    sales.sort_by_key(|s| s.date);

    let mut layers: Vec<FifoLayer> = restocks
        .into_iter()
        .map(|r| FifoLayer {
            restock_id: r.id,
            buy_price: r.buy_price,
            remaining: r.quantity,
        })
        .collect();

    for sale in sales {
        consume(&mut layers, sale.quantity);
    }

    layers
}

/// FIFO cost of selling `quantity` units of `product_id` now.
///
/// Pass the id of a sale being edited as `exclude_sale` so its own previous
/// consumption is not counted against it.
pub fn calculate_cost(
    snapshot: &LedgerSnapshot,
    product_id: ProductId,
    quantity: i64,
    exclude_sale: Option<SaleId>,
) -> FifoCost {
    let mut layers = fifo_layers(snapshot, product_id, exclude_sale);
    let (total_cost, unmet) = consume(&mut layers, quantity);

    FifoCost {
        total_cost,
        fully_covered: unmet <= 0,
    }
}

/// Value of the stock still on hand: Σ remaining × buy price over layers
/// that have units left.
pub fn inventory_value(snapshot: &LedgerSnapshot, product_id: ProductId) -> Decimal {
    fifo_layers(snapshot, product_id, None)
        .iter()
        .filter(|layer| layer.remaining > 0)
        .map(|layer| Decimal::from(layer.remaining) * layer.buy_price)
        .sum()
}

/// Take `quantity` units from the oldest layers first, spilling into newer
/// ones. Returns the cost of the units taken and the quantity left unmet.
///
/// Cost saturates at the `Decimal` bounds rather than panicking on
/// unvalidated ledger data.
fn consume(layers: &mut [FifoLayer], quantity: i64) -> (Decimal, i64) {
    let mut need = quantity;
    let mut cost = Decimal::ZERO;

    for layer in layers.iter_mut() {
        if need <= 0 {
            break;
        }
        let take = layer.remaining.min(need);
        if take <= 0 {
            continue;
        }
        layer.remaining -= take;
        need -= take;
        cost = cost.saturating_add(Decimal::from(take).saturating_mul(layer.buy_price));
    }

    (cost, need)
}
