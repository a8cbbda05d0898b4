use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stockbook_core::{DomainError, DomainResult, Entity, Location, MAX_QUANTITY, record_id};
use stockbook_products::ProductId;

record_id!(
    /// Transfer identifier.
    TransferId
);

/// Relocation of existing stock between the two locations.
///
/// Stock-neutral overall: only the per-location view changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    pub id: TransferId,
    pub date: NaiveDate,
    pub product_id: ProductId,
    pub from_location: Location,
    pub to_location: Location,
    pub quantity: i64,
    #[serde(default)]
    pub note: String,
}

impl Entity for Transfer {
    type Id = TransferId;

    fn id(&self) -> TransferId {
        self.id
    }
}

/// Transfer fields as submitted for create/update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransfer {
    pub date: NaiveDate,
    pub product_id: ProductId,
    pub from_location: Location,
    pub to_location: Location,
    pub quantity: i64,
    #[serde(default)]
    pub note: String,
}

impl NewTransfer {
    pub fn validate(&self) -> DomainResult<()> {
        if self.from_location == self.to_location {
            return Err(DomainError::validation(format!(
                "transfer source and destination are both '{}'",
                self.from_location
            )));
        }
        if self.quantity <= 0 {
            return Err(DomainError::validation("transfer quantity must be positive"));
        }
        if self.quantity > MAX_QUANTITY {
            return Err(DomainError::validation(format!(
                "transfer quantity cannot exceed {MAX_QUANTITY}"
            )));
        }
        Ok(())
    }

    pub fn into_transfer(self, id: TransferId) -> Transfer {
        Transfer {
            id,
            date: self.date,
            product_id: self.product_id,
            from_location: self.from_location,
            to_location: self.to_location,
            quantity: self.quantity,
            note: self.note.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_input(from: Location, to: Location, quantity: i64) -> NewTransfer {
        NewTransfer {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            product_id: ProductId::generate(),
            from_location: from,
            to_location: to,
            quantity,
            note: "  rak penuh ".to_string(),
        }
    }

    #[test]
    fn rejects_same_location() {
        let err = test_input(Location::Kelas, Location::Kelas, 2).validate().unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("kelas")));
    }

    #[test]
    fn rejects_non_positive_quantity() {
        assert!(test_input(Location::Sekret, Location::Kelas, 0).validate().is_err());
    }

    #[test]
    fn rejects_quantity_above_limit() {
        let transfer = test_input(Location::Sekret, Location::Kelas, i64::MAX);
        assert!(matches!(transfer.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn into_transfer_trims_note() {
        let transfer =
            test_input(Location::Sekret, Location::Kelas, 3).into_transfer(TransferId::generate());
        assert_eq!(transfer.note, "rak penuh");
    }

    #[test]
    fn missing_note_defaults_to_empty() {
        let json = serde_json::json!({
            "id": TransferId::generate(),
            "date": "2024-03-01",
            "productId": ProductId::generate(),
            "fromLocation": "sekret",
            "toLocation": "kelas",
            "quantity": 1,
        });
        let transfer: Transfer = serde_json::from_value(json).unwrap();
        assert!(transfer.note.is_empty());
    }
}
