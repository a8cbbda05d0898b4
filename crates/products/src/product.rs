use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockbook_core::{DomainError, DomainResult, Entity, record_id};

record_id!(
    /// Product identifier.
    ProductId
);

/// Label shown wherever a record points at a product that no longer exists.
pub const DELETED_PRODUCT_LABEL: &str = "Unknown product";

/// A sellable product with its current selling price.
///
/// `sell_price` is the live price; sales copy it at write time, so editing it
/// never changes historical revenue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub sell_price: Decimal,
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}

/// Product fields as submitted for create/update (the store assigns the id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub sell_price: Decimal,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, sell_price: Decimal) -> Self {
        Self {
            name: name.into(),
            sell_price,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }
        if self.sell_price.is_sign_negative() {
            return Err(DomainError::validation("sell price cannot be negative"));
        }
        Ok(())
    }

    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name.trim().to_string(),
            sell_price: self.sell_price,
        }
    }
}

/// Resolve a display name, falling back to [`DELETED_PRODUCT_LABEL`].
pub fn display_name(products: &[Product], id: ProductId) -> &str {
    stockbook_core::find_by_id(products, id)
        .map(|p| p.name.as_str())
        .unwrap_or(DELETED_PRODUCT_LABEL)
}
