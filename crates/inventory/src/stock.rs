//! Stock levels, overall and per location.
//!
//! The overall view counts restocked minus sold units. The per-location view
//! starts from restock allocations and applies location-scoped sales and
//! transfers. The two views are computed independently and are not forced to
//! agree: a sale recorded at a location that was never allocated stock still
//! reduces the overall figure by the same amount, but per-location numbers can
//! go negative on their own. Neither view clamps.

use serde::{Deserialize, Serialize};

use stockbook_core::Location;
use stockbook_products::ProductId;
use stockbook_sales::Sale;

use crate::snapshot::LedgerSnapshot;
use crate::transfer::TransferId;

/// Overall stock of a product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockLevel {
    pub total_restocked: i64,
    pub total_sold: i64,
    /// `total_restocked - total_sold`; negative on inconsistent data.
    pub remaining: i64,
}

/// Stock of a product at each location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationStock {
    pub sekret: i64,
    pub kelas: i64,
}

impl LocationStock {
    pub fn at(&self, location: Location) -> i64 {
        match location {
            Location::Sekret => self.sekret,
            Location::Kelas => self.kelas,
        }
    }

    fn add(&mut self, location: Location, delta: i64) {
        match location {
            Location::Sekret => self.sekret += delta,
            Location::Kelas => self.kelas += delta,
        }
    }
}

pub fn stock_for(snapshot: &LedgerSnapshot, product_id: ProductId) -> StockLevel {
    let total_restocked: i64 = snapshot.restocks_of(product_id).map(|r| r.quantity).sum();
    let total_sold: i64 = snapshot.sales_of(product_id).map(|s| s.quantity).sum();

    StockLevel {
        total_restocked,
        total_sold,
        remaining: total_restocked - total_sold,
    }
}

/// `allocated - sold - transferred out + transferred in`, per location.
pub fn stock_by_location(snapshot: &LedgerSnapshot, product_id: ProductId) -> LocationStock {
    stock_by_location_excluding(snapshot, product_id, None)
}

/// Like [`stock_by_location`], ignoring one transfer.
///
/// Used when editing a transfer: the stock available at its source must not
/// already account for the transfer being replaced.
pub fn stock_by_location_excluding(
    snapshot: &LedgerSnapshot,
    product_id: ProductId,
    exclude_transfer: Option<TransferId>,
) -> LocationStock {
    let mut stock = LocationStock::default();

    for restock in snapshot.restocks_of(product_id) {
        for location in Location::ALL {
            stock.add(location, restock.allocation(location));
        }
    }

    for sale in snapshot.sales_of(product_id) {
        stock.add(sale.location, -sale.quantity);
    }

    for transfer in snapshot
        .transfers_of(product_id)
        .filter(|t| Some(t.id) != exclude_transfer)
    {
        stock.add(transfer.from_location, -transfer.quantity);
        stock.add(transfer.to_location, transfer.quantity);
    }

    stock
}

/// Most recent sale of a product at a location.
///
/// Its `remaining_at_location` is the natural starting count for the next
/// sale entry there. On equal dates the later record in the snapshot wins.
pub fn last_sale_at_location(
    snapshot: &LedgerSnapshot,
    product_id: ProductId,
    location: Location,
) -> Option<&Sale> {
    snapshot
        .sales_of(product_id)
        .filter(|s| s.location == location)
        .max_by_key(|s| s.date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use stockbook_purchasing::{NewRestock, Restock, RestockId};
    use stockbook_sales::{SaleId, SaleInput};

    use crate::transfer::{NewTransfer, Transfer};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, d).unwrap()
    }

    fn test_restock(product_id: ProductId, sekret: i64, kelas: i64) -> Restock {
        NewRestock {
            date: day(1),
            product_id,
            quantity: sekret + kelas,
            total_capital: dec!(1000),
            alloc_sekret: sekret,
            alloc_kelas: kelas,
        }
        .into_restock(RestockId::generate())
    }

    fn test_sale(
        product_id: ProductId,
        location: Location,
        date: NaiveDate,
        initial: i64,
        remaining: i64,
    ) -> Sale {
        SaleInput {
            date,
            product_id,
            location,
            initial_at_location: initial,
            remaining_at_location: remaining,
        }
        .price(Decimal::ZERO, Decimal::ZERO)
        .unwrap()
        .into_sale(SaleId::generate())
    }

    fn test_transfer(
        product_id: ProductId,
        from: Location,
        to: Location,
        quantity: i64,
    ) -> Transfer {
        NewTransfer {
            date: day(5),
            product_id,
            from_location: from,
            to_location: to,
            quantity,
            note: String::new(),
        }
        .into_transfer(TransferId::generate())
    }

    #[test]
    fn overall_stock_is_restocked_minus_sold() {
        let product_id = ProductId::generate();
        let snapshot = LedgerSnapshot {
            restocks: vec![test_restock(product_id, 6, 4), test_restock(product_id, 5, 0)],
            sales: vec![test_sale(product_id, Location::Kelas, day(2), 4, 1)],
            ..LedgerSnapshot::default()
        };

        let stock = stock_for(&snapshot, product_id);
        assert_eq!(stock.total_restocked, 15);
        assert_eq!(stock.total_sold, 3);
        assert_eq!(stock.remaining, 12);
    }

    #[test]
    fn overall_stock_can_go_negative() {
        let product_id = ProductId::generate();
        let snapshot = LedgerSnapshot {
            restocks: vec![test_restock(product_id, 2, 0)],
            sales: vec![test_sale(product_id, Location::Sekret, day(2), 9, 0)],
            ..LedgerSnapshot::default()
        };

        assert_eq!(stock_for(&snapshot, product_id).remaining, -7);
    }

    #[test]
    fn transfer_moves_stock_between_locations() {
        let product_id = ProductId::generate();
        let snapshot = LedgerSnapshot {
            restocks: vec![test_restock(product_id, 10, 0)],
            transfers: vec![test_transfer(product_id, Location::Sekret, Location::Kelas, 3)],
            ..LedgerSnapshot::default()
        };

        let by_location = stock_by_location(&snapshot, product_id);
        assert_eq!(by_location, LocationStock { sekret: 7, kelas: 3 });
        // Transfers never change the overall figure.
        assert_eq!(stock_for(&snapshot, product_id).remaining, 10);
    }

    #[test]
    fn sales_reduce_only_their_location() {
        let product_id = ProductId::generate();
        let snapshot = LedgerSnapshot {
            restocks: vec![test_restock(product_id, 6, 4)],
            sales: vec![
                test_sale(product_id, Location::Sekret, day(2), 6, 4),
                test_sale(product_id, Location::Kelas, day(3), 4, 3),
            ],
            ..LedgerSnapshot::default()
        };

        assert_eq!(stock_by_location(&snapshot, product_id), LocationStock { sekret: 4, kelas: 3 });
    }

    #[test]
    fn location_view_is_independent_of_overall_view() {
        let product_id = ProductId::generate();
        let snapshot = LedgerSnapshot {
            restocks: vec![test_restock(product_id, 5, 0)],
            sales: vec![test_sale(product_id, Location::Kelas, day(2), 2, 0)],
            ..LedgerSnapshot::default()
        };

        assert_eq!(stock_for(&snapshot, product_id).remaining, 3);
        assert_eq!(
            stock_by_location(&snapshot, product_id),
            LocationStock { sekret: 5, kelas: -2 }
        );
    }

    #[test]
    fn excluding_a_transfer_restores_its_source() {
        let product_id = ProductId::generate();
        let transfer = test_transfer(product_id, Location::Sekret, Location::Kelas, 4);
        let transfer_id = transfer.id;
        let snapshot = LedgerSnapshot {
            restocks: vec![test_restock(product_id, 10, 0)],
            transfers: vec![transfer],
            ..LedgerSnapshot::default()
        };

        let without = stock_by_location_excluding(&snapshot, product_id, Some(transfer_id));
        assert_eq!(without, LocationStock { sekret: 10, kelas: 0 });
    }

    #[test]
    fn last_sale_is_latest_by_date_then_position() {
        let product_id = ProductId::generate();
        let early = test_sale(product_id, Location::Sekret, day(2), 10, 8);
        let late_a = test_sale(product_id, Location::Sekret, day(6), 8, 5);
        let late_b = test_sale(product_id, Location::Sekret, day(6), 5, 2);
        let elsewhere = test_sale(product_id, Location::Kelas, day(9), 3, 1);
        let late_b_id = late_b.id;
        let snapshot = LedgerSnapshot {
            sales: vec![late_a, early, late_b, elsewhere],
            ..LedgerSnapshot::default()
        };

        let last = last_sale_at_location(&snapshot, product_id, Location::Sekret).unwrap();
        assert_eq!(last.id, late_b_id);
        assert_eq!(last.remaining_at_location, 2);
        let unknown = ProductId::generate();
        assert!(last_sale_at_location(&snapshot, unknown, Location::Sekret).is_none());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: remaining is always restocked minus sold, even when negative.
            #[test]
            fn remaining_is_restocked_minus_sold(
                restocks in prop::collection::vec((0i64..50, 0i64..50), 0..8),
                sales in prop::collection::vec((1i64..80, any::<bool>()), 0..8),
            ) {
                let product_id = ProductId::generate();
                let snapshot = LedgerSnapshot {
                    restocks: restocks
                        .iter()
                        .filter(|(s, k)| s + k > 0)
                        .map(|&(s, k)| test_restock(product_id, s, k))
                        .collect(),
                    sales: sales
                        .iter()
                        .map(|&(q, at_sekret)| {
                            let location =
                                if at_sekret { Location::Sekret } else { Location::Kelas };
                            test_sale(product_id, location, day(3), q, 0)
                        })
                        .collect(),
                    ..LedgerSnapshot::default()
                };

                let stock = stock_for(&snapshot, product_id);
                prop_assert_eq!(stock.remaining, stock.total_restocked - stock.total_sold);
            }

            /// Property: transfers between the two locations conserve their sum.
            #[test]
            fn transfers_conserve_location_total(
                sekret in 0i64..50,
                kelas in 0i64..50,
                moves in prop::collection::vec((1i64..20, any::<bool>()), 0..6),
            ) {
                prop_assume!(sekret + kelas > 0);
                let product_id = ProductId::generate();
                let snapshot = LedgerSnapshot {
                    restocks: vec![test_restock(product_id, sekret, kelas)],
                    transfers: moves
                        .iter()
                        .map(|&(q, forward)| {
                            if forward {
                                test_transfer(product_id, Location::Sekret, Location::Kelas, q)
                            } else {
                                test_transfer(product_id, Location::Kelas, Location::Sekret, q)
                            }
                        })
                        .collect(),
                    ..LedgerSnapshot::default()
                };

                let by_location = stock_by_location(&snapshot, product_id);
                prop_assert_eq!(by_location.sekret + by_location.kelas, sekret + kelas);
            }
        }
    }
}
