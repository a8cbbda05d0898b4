//! End-to-end tests: store → change notification → service cache → engines.
//!
//! Verifies:
//! - Writes surface in reports only after notifications are processed
//! - Owner scopes stay isolated
//! - Two services on one store converge

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use stockbook_core::{Location, OwnerId};
    use stockbook_inventory::{LocationStock, NewTransfer};
    use stockbook_products::NewProduct;
    use stockbook_purchasing::NewRestock;
    use stockbook_sales::SaleInput;

    use crate::config::Config;
    use crate::context::AppContext;
    use crate::ledger_store::{InMemoryLedgerStore, LedgerStore};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn test_config(owner_id: OwnerId) -> Config {
        Config {
            owner_id,
            log_format: stockbook_observability::LogFormat::Json,
            clear_includes_transfers: true,
        }
    }

    async fn setup() -> (Arc<InMemoryLedgerStore>, AppContext<Arc<InMemoryLedgerStore>>) {
        let owner_id = OwnerId::new();
        let store = Arc::new(InMemoryLedgerStore::signed_in(owner_id));
        let ctx = AppContext::bootstrap(test_config(owner_id), store.clone())
            .await
            .unwrap();
        (store, ctx)
    }

    #[tokio::test]
    async fn full_ledger_flow_feeds_reports() {
        let (_store, mut ctx) = setup().await;
        let service = ctx.service_mut();

        let pulpen = service.add_product(NewProduct::new("Pulpen", dec!(5000))).await.unwrap();
        service.process_changes();

        service
            .add_restock(NewRestock {
                date: day(1),
                product_id: pulpen,
                quantity: 10,
                total_capital: dec!(40000),
                alloc_sekret: 10,
                alloc_kelas: 0,
            })
            .await
            .unwrap();
        service.process_changes();

        service
            .add_transfer(NewTransfer {
                date: day(1),
                product_id: pulpen,
                from_location: Location::Sekret,
                to_location: Location::Kelas,
                quantity: 3,
                note: String::new(),
            })
            .await
            .unwrap();
        service.process_changes();

        service
            .add_sale(SaleInput {
                date: day(2),
                product_id: pulpen,
                location: Location::Sekret,
                initial_at_location: 7,
                remaining_at_location: 3,
            })
            .await
            .unwrap();
        service.process_changes();

        let stats = service.dashboard_stats();
        assert_eq!(stats.total_revenue, dec!(20000));
        assert_eq!(stats.total_profit, dec!(4000));
        assert_eq!(stats.total_sold, 4);
        assert_eq!(stats.profit_percentage, dec!(20));

        let report = service.report_by_range(day(1), day(31));
        assert_eq!(report.items.len(), 1);
        assert_eq!(report.items[0].product_name, "Pulpen");
        assert_eq!(report.summary.total_cost, dec!(16000));

        assert_eq!(service.stock_for(pulpen).remaining, 6);
        assert_eq!(service.stock_by_location(pulpen), LocationStock { sekret: 3, kelas: 3 });
        assert_eq!(service.inventory_value(pulpen), dec!(24000));
        assert_eq!(service.valuation_summary().total_value, dec!(24000));

        let last = service.last_sale_at_location(pulpen, Location::Sekret).unwrap();
        assert_eq!(last.remaining_at_location, 3);
    }

    #[tokio::test]
    async fn owners_do_not_see_each_other() {
        let (store, mut ctx) = setup().await;
        ctx.service()
            .add_product(NewProduct::new("Buku", dec!(7000)))
            .await
            .unwrap();
        ctx.service_mut().process_changes();
        assert_eq!(ctx.service().products().len(), 1);

        store.sign_in(OwnerId::new());
        ctx.service_mut().refresh().await.unwrap();
        assert!(ctx.service().products().is_empty());
    }

    #[tokio::test]
    async fn two_services_on_one_store_converge() {
        let (store, mut ctx) = setup().await;
        let mut other = crate::service::InventoryService::connect(store.clone()).await.unwrap();

        ctx.service()
            .add_product(NewProduct::new("Map", dec!(1500)))
            .await
            .unwrap();

        ctx.service_mut().process_changes();
        other.process_changes();
        assert_eq!(ctx.service().snapshot(), other.snapshot());

        // A write made straight to the store reaches both caches as well.
        store.clear_all(true).await.unwrap();
        ctx.service_mut().process_changes();
        other.process_changes();
        assert!(ctx.service().snapshot().is_empty());
        assert!(other.snapshot().is_empty());
    }
}
