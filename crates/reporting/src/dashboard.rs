use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockbook_inventory::LedgerSnapshot;

use crate::percentage;

/// Headline numbers over every recorded sale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_revenue: Decimal,
    pub total_profit: Decimal,
    pub total_sold: i64,
    /// Profit as a percentage of revenue; zero when there is no revenue.
    pub profit_percentage: Decimal,
}

pub fn dashboard_stats(snapshot: &LedgerSnapshot) -> DashboardStats {
    let total_revenue: Decimal = snapshot.sales.iter().map(|s| s.revenue).sum();
    let total_profit: Decimal = snapshot.sales.iter().map(|s| s.profit).sum();
    let total_sold: i64 = snapshot.sales.iter().map(|s| s.quantity).sum();

    DashboardStats {
        total_revenue,
        total_profit,
        total_sold,
        profit_percentage: percentage(total_profit, total_revenue),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use stockbook_core::Location;
    use stockbook_products::ProductId;
    use stockbook_sales::{Sale, SaleId, SaleInput};

    fn test_sale(qty: i64, price: Decimal, cost: Decimal) -> Sale {
        SaleInput {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            product_id: ProductId::generate(),
            location: Location::Kelas,
            initial_at_location: qty,
            remaining_at_location: 0,
        }
        .price(price, cost)
        .unwrap()
        .into_sale(SaleId::generate())
    }

    #[test]
    fn empty_ledger_has_zero_percentage() {
        let stats = dashboard_stats(&LedgerSnapshot::default());
        assert_eq!(stats, DashboardStats::default());
    }

    #[test]
    fn sums_all_sales() {
        let snapshot = LedgerSnapshot {
            sales: vec![
                test_sale(4, dec!(5000), dec!(16000)),
                test_sale(2, dec!(1000), dec!(1000)),
            ],
            ..LedgerSnapshot::default()
        };

        let stats = dashboard_stats(&snapshot);
        assert_eq!(stats.total_revenue, dec!(22000));
        assert_eq!(stats.total_profit, dec!(5000));
        assert_eq!(stats.total_sold, 6);
        assert_eq!(stats.profit_percentage.round_dp(2), dec!(22.73));
    }
}
