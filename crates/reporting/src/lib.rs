//! Read-only report views derived from a [`LedgerSnapshot`].
//!
//! Sales carry their own stamped revenue/cost/profit, so reports only sum
//! recorded values; nothing is re-costed here.
//!
//! [`LedgerSnapshot`]: stockbook_inventory::LedgerSnapshot

pub mod dashboard;
pub mod sales_report;
pub mod stock_overview;
pub mod valuation;

pub use dashboard::{DashboardStats, dashboard_stats};
pub use sales_report::{ReportItem, ReportSummary, SalesReport, report_by_range};
pub use stock_overview::{StockOverviewRow, stock_overview};
pub use valuation::{ValuationItem, ValuationSummary, valuation_summary};

use rust_decimal::Decimal;

/// `part / whole * 100`, or zero when `whole` is not positive.
pub fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    if whole > Decimal::ZERO {
        part / whole * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    }
}
