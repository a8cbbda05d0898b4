use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Subcommand;
use serde_json::json;

use stockbook_core::Location;
use stockbook_infra::{InventoryService, LedgerStore};
use stockbook_products::ProductId;
use stockbook_sales::SaleId;

#[derive(Subcommand)]
pub enum Command {
    /// Revenue, profit and units sold over every sale
    Dashboard,

    /// Per-product sales report for an inclusive date range
    Report {
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
    },

    /// Stock per product, overall and by location
    Stock {
        /// Only this product
        #[arg(long)]
        product: Option<ProductId>,
    },

    /// FIFO cost of selling a quantity now
    Cost {
        #[arg(long)]
        product: ProductId,
        #[arg(long)]
        quantity: i64,
        /// Price as if this sale had not been recorded (editing it)
        #[arg(long)]
        exclude_sale: Option<SaleId>,
    },

    /// FIFO value of stock on hand
    Valuation,

    /// Latest sale of a product at a location
    LastSale {
        #[arg(long)]
        product: ProductId,
        #[arg(long)]
        location: Location,
    },
}

/// Run a command against the service and render its result as JSON.
pub fn run<S: LedgerStore>(command: &Command, service: &InventoryService<S>) -> Result<String> {
    let value = match command {
        Command::Dashboard => serde_json::to_value(service.dashboard_stats())?,
        Command::Report { from, to } => serde_json::to_value(service.report_by_range(*from, *to))?,
        Command::Stock { product: None } => serde_json::to_value(service.stock_overview())?,
        Command::Stock { product: Some(id) } => {
            let product = service
                .product(*id)
                .with_context(|| format!("no product with id {id}"))?;
            json!({
                "productId": product.id,
                "name": product.name,
                "stock": service.stock_for(*id),
                "byLocation": service.stock_by_location(*id),
            })
        }
        Command::Cost {
            product,
            quantity,
            exclude_sale,
        } => serde_json::to_value(service.calculate_cost(*product, *quantity, *exclude_sale))?,
        Command::Valuation => serde_json::to_value(service.valuation_summary())?,
        Command::LastSale { product, location } => {
            serde_json::to_value(service.last_sale_at_location(*product, *location))?
        }
    };

    Ok(serde_json::to_string_pretty(&value)?)
}
