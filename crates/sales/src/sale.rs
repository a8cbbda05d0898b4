use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockbook_core::{DomainError, DomainResult, Entity, Location, MAX_QUANTITY, record_id};
use stockbook_products::ProductId;

record_id!(
    /// Sale identifier.
    SaleId
);

/// A recorded sale with its pricing stamped at write time.
///
/// `cost` and `profit` are computed once, when the sale is added or edited.
/// Later restock edits do not change them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: SaleId,
    pub date: NaiveDate,
    pub product_id: ProductId,
    pub location: Location,
    pub quantity: i64,
    /// Product price at the time of sale.
    pub sell_price: Decimal,
    pub revenue: Decimal,
    pub cost: Decimal,
    pub profit: Decimal,
    #[serde(rename = "initialLokasi")]
    pub initial_at_location: i64,
    #[serde(rename = "remainingLokasi")]
    pub remaining_at_location: i64,
}

impl Entity for Sale {
    type Id = SaleId;

    fn id(&self) -> SaleId {
        self.id
    }
}

/// Sale as entered: a count at one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleInput {
    pub date: NaiveDate,
    pub product_id: ProductId,
    pub location: Location,
    #[serde(rename = "initialLokasi")]
    pub initial_at_location: i64,
    #[serde(rename = "remainingLokasi")]
    pub remaining_at_location: i64,
}

impl SaleInput {
    /// Units sold: `initial - remaining`. Not validated.
    pub fn quantity(&self) -> i64 {
        self.initial_at_location - self.remaining_at_location
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.initial_at_location < 0 || self.remaining_at_location < 0 {
            return Err(DomainError::validation("stock counts cannot be negative"));
        }
        if self.initial_at_location > MAX_QUANTITY || self.remaining_at_location > MAX_QUANTITY {
            return Err(DomainError::validation(format!(
                "stock counts cannot exceed {MAX_QUANTITY}"
            )));
        }
        if self.quantity() <= 0 {
            return Err(DomainError::validation(format!(
                "sold quantity must be positive (initial {}, remaining {})",
                self.initial_at_location, self.remaining_at_location
            )));
        }
        Ok(())
    }

    /// Stamp prices onto the input.
    ///
    /// `revenue = quantity * sell_price`, `profit = revenue - cost`. Fails
    /// instead of overflowing when the amounts leave `Decimal` range.
    pub fn price(self, sell_price: Decimal, cost: Decimal) -> DomainResult<NewSale> {
        let quantity = self.quantity();
        let out_of_range = || DomainError::validation("sale amount is out of range");
        let revenue = Decimal::from(quantity)
            .checked_mul(sell_price)
            .ok_or_else(out_of_range)?;
        let profit = revenue.checked_sub(cost).ok_or_else(out_of_range)?;
        Ok(NewSale {
            date: self.date,
            product_id: self.product_id,
            location: self.location,
            quantity,
            sell_price,
            revenue,
            cost,
            profit,
            initial_at_location: self.initial_at_location,
            remaining_at_location: self.remaining_at_location,
        })
    }
}

/// A priced sale ready to persist (the store assigns the id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSale {
    pub date: NaiveDate,
    pub product_id: ProductId,
    pub location: Location,
    pub quantity: i64,
    pub sell_price: Decimal,
    pub revenue: Decimal,
    pub cost: Decimal,
    pub profit: Decimal,
    #[serde(rename = "initialLokasi")]
    pub initial_at_location: i64,
    #[serde(rename = "remainingLokasi")]
    pub remaining_at_location: i64,
}

impl NewSale {
    pub fn into_sale(self, id: SaleId) -> Sale {
        Sale {
            id,
            date: self.date,
            product_id: self.product_id,
            location: self.location,
            quantity: self.quantity,
            sell_price: self.sell_price,
            revenue: self.revenue,
            cost: self.cost,
            profit: self.profit,
            initial_at_location: self.initial_at_location,
            remaining_at_location: self.remaining_at_location,
        }
    }
}
