use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockbook_inventory::LedgerSnapshot;
use stockbook_products::{ProductId, display_name};

use crate::percentage;

/// Per-product totals for sales inside the report range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub total_sold: i64,
    pub revenue: Decimal,
    pub cost: Decimal,
    pub profit: Decimal,
}

impl ReportItem {
    /// Profit as a percentage of this product's revenue.
    pub fn margin(&self) -> Decimal {
        percentage(self.profit, self.revenue)
    }
}

/// Totals over the report items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_revenue: Decimal,
    pub total_cost: Decimal,
    pub total_profit: Decimal,
    pub profit_margin: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesReport {
    pub items: Vec<ReportItem>,
    pub summary: ReportSummary,
}

/// Sales between `start` and `end` (both inclusive), grouped by product.
///
/// Items appear in the order their product is first seen among the filtered
/// sales. Names come from the current catalogue. The summary is summed from
/// the items, so it always equals the sum of item fields.
pub fn report_by_range(snapshot: &LedgerSnapshot, start: NaiveDate, end: NaiveDate) -> SalesReport {
    let mut items: Vec<ReportItem> = Vec::new();
    let mut index: HashMap<ProductId, usize> = HashMap::new();

    for sale in snapshot
        .sales
        .iter()
        .filter(|s| s.date >= start && s.date <= end)
    {
        let slot = *index.entry(sale.product_id).or_insert_with(|| {
            items.push(ReportItem {
                product_id: sale.product_id,
                product_name: display_name(&snapshot.products, sale.product_id).to_string(),
                total_sold: 0,
                revenue: Decimal::ZERO,
                cost: Decimal::ZERO,
                profit: Decimal::ZERO,
            });
            items.len() - 1
        });

        let item = &mut items[slot];
        item.total_sold += sale.quantity;
        item.revenue += sale.revenue;
        item.cost += sale.cost;
        item.profit += sale.profit;
    }

    let total_revenue: Decimal = items.iter().map(|i| i.revenue).sum();
    let total_cost: Decimal = items.iter().map(|i| i.cost).sum();
    let total_profit: Decimal = items.iter().map(|i| i.profit).sum();

    SalesReport {
        summary: ReportSummary {
            total_revenue,
            total_cost,
            total_profit,
            profit_margin: percentage(total_profit, total_revenue),
        },
        items,
    }
}
