use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockbook_core::{DomainError, DomainResult, Entity, Location, MAX_QUANTITY, record_id};
use stockbook_products::ProductId;

record_id!(
    /// Restock identifier.
    RestockId
);

/// A purchase batch.
///
/// Invariants (enforced by [`NewRestock::validate`]):
/// - `quantity > 0`
/// - `alloc_sekret + alloc_kelas == quantity`
/// - `buy_price * quantity ≈ total_capital`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RestockWire")]
pub struct Restock {
    pub id: RestockId,
    pub date: NaiveDate,
    pub product_id: ProductId,
    pub quantity: i64,
    /// Unit cost, derived as `total_capital / quantity`.
    pub buy_price: Decimal,
    pub total_capital: Decimal,
    pub alloc_sekret: i64,
    pub alloc_kelas: i64,
}

impl Restock {
    /// Units of this batch initially placed at `location`.
    pub fn allocation(&self, location: Location) -> i64 {
        match location {
            Location::Sekret => self.alloc_sekret,
            Location::Kelas => self.alloc_kelas,
        }
    }
}

impl Entity for Restock {
    type Id = RestockId;

    fn id(&self) -> RestockId {
        self.id
    }
}

/// Older records were written before `totalCapital` existed; they carry only
/// the unit price, so the capital is reconstructed from it.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RestockWire {
    id: RestockId,
    date: NaiveDate,
    product_id: ProductId,
    quantity: i64,
    buy_price: Decimal,
    #[serde(default)]
    total_capital: Option<Decimal>,
    #[serde(default)]
    alloc_sekret: i64,
    #[serde(default)]
    alloc_kelas: i64,
}

impl From<RestockWire> for Restock {
    fn from(w: RestockWire) -> Self {
        let total_capital = w
            .total_capital
            .unwrap_or_else(|| w.buy_price * Decimal::from(w.quantity));
        Self {
            id: w.id,
            date: w.date,
            product_id: w.product_id,
            quantity: w.quantity,
            buy_price: w.buy_price,
            total_capital,
            alloc_sekret: w.alloc_sekret,
            alloc_kelas: w.alloc_kelas,
        }
    }
}

/// Restock fields as submitted for create/update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRestock {
    pub date: NaiveDate,
    pub product_id: ProductId,
    pub quantity: i64,
    pub total_capital: Decimal,
    pub alloc_sekret: i64,
    pub alloc_kelas: i64,
}

impl NewRestock {
    pub fn validate(&self) -> DomainResult<()> {
        if self.quantity <= 0 {
            return Err(DomainError::validation("restock quantity must be positive"));
        }
        if self.quantity > MAX_QUANTITY {
            return Err(DomainError::validation(format!(
                "restock quantity cannot exceed {MAX_QUANTITY}"
            )));
        }
        if self.alloc_sekret < 0 || self.alloc_kelas < 0 {
            return Err(DomainError::validation("location allocation cannot be negative"));
        }
        if self.alloc_sekret + self.alloc_kelas != self.quantity {
            return Err(DomainError::validation(format!(
                "allocation sekret ({}) + kelas ({}) must equal quantity ({})",
                self.alloc_sekret, self.alloc_kelas, self.quantity
            )));
        }
        if self.total_capital.is_sign_negative() {
            return Err(DomainError::validation("total capital cannot be negative"));
        }
        Ok(())
    }

    /// Unit cost of the batch. Callers must validate first (quantity > 0).
    pub fn buy_price(&self) -> Decimal {
        if self.quantity == 0 {
            return Decimal::ZERO;
        }
        self.total_capital / Decimal::from(self.quantity)
    }

    pub fn into_restock(self, id: RestockId) -> Restock {
        let buy_price = self.buy_price();
        Restock {
            id,
            date: self.date,
            product_id: self.product_id,
            quantity: self.quantity,
            buy_price,
            total_capital: self.total_capital,
            alloc_sekret: self.alloc_sekret,
            alloc_kelas: self.alloc_kelas,
        }
    }
}
