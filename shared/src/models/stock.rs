//! Stock locations, directions, and movement planning

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::order::OrderLine;

/// Direction of a stock adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockDirection {
    Increase,
    Decrease,
}

impl StockDirection {
    /// The reversing direction, used when undoing an order's stock effect
    pub fn opposite(self) -> Self {
        match self {
            StockDirection::Increase => StockDirection::Decrease,
            StockDirection::Decrease => StockDirection::Increase,
        }
    }

    /// Apply the direction's sign to a quantity
    pub fn signed(self, quantity: i64) -> i64 {
        match self {
            StockDirection::Increase => quantity,
            StockDirection::Decrease => -quantity,
        }
    }
}

/// A stock location: the store itself or a named warehouse.
/// Serialized as the string `"store"` or a warehouse id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StockLocation {
    Store,
    Warehouse(Uuid),
}

impl StockLocation {
    pub fn warehouse_id(self) -> Option<Uuid> {
        match self {
            StockLocation::Store => None,
            StockLocation::Warehouse(id) => Some(id),
        }
    }
}

impl std::fmt::Display for StockLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StockLocation::Store => write!(f, "store"),
            StockLocation::Warehouse(id) => write!(f, "{}", id),
        }
    }
}

impl TryFrom<String> for StockLocation {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == "store" {
            return Ok(StockLocation::Store);
        }
        Uuid::parse_str(&value)
            .map(StockLocation::Warehouse)
            .map_err(|_| format!("invalid stock location: {}", value))
    }
}

impl From<StockLocation> for String {
    fn from(location: StockLocation) -> Self {
        location.to_string()
    }
}

/// One product's stock held at a warehouse. Entries are never removed; a
/// drained entry simply sits at zero (or below, for oversell).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEntry {
    pub product_id: Uuid,
    pub stock: i64,
}

/// One planned mutation of a (product, location) stock entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockMovement {
    pub product_id: Uuid,
    pub location: StockLocation,
    pub delta: i64,
}

/// Units moved by a line item: quantity times the variant multiplier
pub fn effective_quantity(quantity: i64, variant_quantity: i64) -> i64 {
    quantity * variant_quantity
}

/// Plan the stock movements an order's lines produce in the given direction.
/// One movement per line, in line order; callers execute them sequentially
/// and stop at the first failure.
pub fn plan_movements(direction: StockDirection, lines: &[OrderLine]) -> Vec<StockMovement> {
    lines
        .iter()
        .map(|line| StockMovement {
            product_id: line.product_id,
            location: match line.warehouse_id {
                Some(id) => StockLocation::Warehouse(id),
                None => StockLocation::Store,
            },
            delta: direction.signed(effective_quantity(line.quantity, line.variant.quantity)),
        })
        .collect()
}

/// Transfer validation failures, in the order the checks run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferError {
    SameLocation,
    NonPositiveAmount,
    SourceNotFound,
    DestinationNotFound,
    InsufficientStock,
}

impl TransferError {
    pub fn message(self) -> &'static str {
        match self {
            TransferError::SameLocation => "Source is same as destination",
            TransferError::NonPositiveAmount => "Must be greater than 0",
            TransferError::SourceNotFound => "Source not found",
            TransferError::DestinationNotFound => "Destination not found",
            TransferError::InsufficientStock => {
                "Transfer amount is greater than stored quantity"
            }
        }
    }

    pub fn message_th(self) -> &'static str {
        match self {
            TransferError::SameLocation => "ต้นทางและปลายทางเป็นที่เดียวกัน",
            TransferError::NonPositiveAmount => "ต้องมากกว่า 0",
            TransferError::SourceNotFound => "ไม่พบต้นทาง",
            TransferError::DestinationNotFound => "ไม่พบปลายทาง",
            TransferError::InsufficientStock => "จำนวนที่โอนมากกว่าจำนวนคงเหลือ",
        }
    }
}

/// The transfer checks that need no storage access: distinct locations and a
/// positive amount. Runs before either location is resolved.
pub fn validate_transfer_request(
    source: StockLocation,
    destination: StockLocation,
    amount: i64,
) -> Result<(), TransferError> {
    if source == destination {
        return Err(TransferError::SameLocation);
    }
    if amount <= 0 {
        return Err(TransferError::NonPositiveAmount);
    }
    Ok(())
}

/// The stock check that runs last, after both locations resolve
pub fn validate_transfer_stock(source_stock: i64, amount: i64) -> Result<(), TransferError> {
    if source_stock < amount {
        return Err(TransferError::InsufficientStock);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::order::{OrderLine, OrderLineInput, VariantSnapshot};
    use rust_decimal::Decimal;

    fn line(quantity: i64, variant_quantity: i64, warehouse_id: Option<Uuid>) -> OrderLine {
        OrderLine::compute(
            &OrderLineInput {
                id: Uuid::new_v4(),
                product_id: Uuid::new_v4(),
                quantity,
                item_price: Decimal::from(10),
                variant: Some(VariantSnapshot {
                    name: "case".to_string(),
                    quantity: variant_quantity,
                }),
                warehouse_id,
            },
            None,
        )
    }

    #[test]
    fn test_signed_delta() {
        assert_eq!(StockDirection::Increase.signed(7), 7);
        assert_eq!(StockDirection::Decrease.signed(7), -7);
    }

    #[test]
    fn test_opposite_direction_round_trips() {
        assert_eq!(
            StockDirection::Increase.opposite().opposite(),
            StockDirection::Increase
        );
    }

    #[test]
    fn test_plan_movements_uses_effective_quantity() {
        let warehouse = Uuid::new_v4();
        let lines = vec![line(100, 10, None), line(5, 1, Some(warehouse))];

        let movements = plan_movements(StockDirection::Increase, &lines);
        assert_eq!(movements.len(), 2);
        assert_eq!(movements[0].delta, 1000);
        assert_eq!(movements[0].location, StockLocation::Store);
        assert_eq!(movements[1].delta, 5);
        assert_eq!(movements[1].location, StockLocation::Warehouse(warehouse));
    }

    #[test]
    fn test_plan_movements_decrease_negates() {
        let lines = vec![line(100, 10, None)];
        let movements = plan_movements(StockDirection::Decrease, &lines);
        assert_eq!(movements[0].delta, -1000);
    }

    #[test]
    fn test_transfer_rejects_same_location() {
        let w = Uuid::new_v4();
        assert_eq!(
            validate_transfer_request(StockLocation::Warehouse(w), StockLocation::Warehouse(w), 5),
            Err(TransferError::SameLocation)
        );
    }

    #[test]
    fn test_transfer_rejects_non_positive_amount() {
        let w = Uuid::new_v4();
        assert_eq!(
            validate_transfer_request(StockLocation::Store, StockLocation::Warehouse(w), 0),
            Err(TransferError::NonPositiveAmount)
        );
    }

    #[test]
    fn test_same_location_checked_before_amount() {
        // Both checks would fail; the location check must win
        assert_eq!(
            validate_transfer_request(StockLocation::Store, StockLocation::Store, -1),
            Err(TransferError::SameLocation)
        );
    }

    #[test]
    fn test_transfer_stock_check() {
        assert!(validate_transfer_stock(10, 10).is_ok());
        assert_eq!(
            validate_transfer_stock(9, 10),
            Err(TransferError::InsufficientStock)
        );
    }

    #[test]
    fn test_location_parsing() {
        assert_eq!(
            StockLocation::try_from("store".to_string()),
            Ok(StockLocation::Store)
        );
        let id = Uuid::new_v4();
        assert_eq!(
            StockLocation::try_from(id.to_string()),
            Ok(StockLocation::Warehouse(id))
        );
        assert!(StockLocation::try_from("shelf-9".to_string()).is_err());
    }
}
