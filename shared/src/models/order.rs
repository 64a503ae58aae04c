//! Order line items and total computation, shared by purchase and sales orders

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::product::DEFAULT_VARIANT_NAME;
use super::stock::StockDirection;

/// The variant applied to a line item, snapshotted at computation time so
/// later variant edits cannot change historical totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantSnapshot {
    pub name: String,
    pub quantity: i64,
}

impl VariantSnapshot {
    /// The implicit multiplier when a line names no variant
    pub fn unit() -> Self {
        Self {
            name: DEFAULT_VARIANT_NAME.to_string(),
            quantity: 1,
        }
    }
}

impl Default for VariantSnapshot {
    fn default() -> Self {
        Self::unit()
    }
}

/// A line item as submitted by the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineInput {
    /// Client-supplied synthetic id, kept stable across edits
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i64,
    pub item_price: Decimal,
    pub variant: Option<VariantSnapshot>,
    /// Absent means the store location
    pub warehouse_id: Option<Uuid>,
}

/// A fully computed line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i64,
    pub item_price: Decimal,
    pub total_price: Decimal,
    pub variant: VariantSnapshot,
    pub warehouse_id: Option<Uuid>,
    /// Sales orders only: the product's selling price when the line first
    /// appeared, preserved across later edits
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_item_price: Option<Decimal>,
}

impl OrderLine {
    /// Compute a line from client input. `original_item_price` is `None`
    /// for purchase orders.
    pub fn compute(input: &OrderLineInput, original_item_price: Option<Decimal>) -> Self {
        let variant = input.variant.clone().unwrap_or_default();
        let total_price = line_total(input.quantity, variant.quantity, input.item_price);
        Self {
            id: input.id,
            product_id: input.product_id,
            quantity: input.quantity,
            item_price: input.item_price,
            total_price,
            variant,
            warehouse_id: input.warehouse_id,
            original_item_price,
        }
    }
}

/// totalPrice = quantity × variant multiplier × unit price
pub fn line_total(quantity: i64, variant_quantity: i64, item_price: Decimal) -> Decimal {
    Decimal::from(quantity) * Decimal::from(variant_quantity) * item_price
}

/// Order total: the sum of line totals
pub fn order_total(lines: &[OrderLine]) -> Decimal {
    lines.iter().map(|l| l.total_price).sum()
}

/// Order kind decides which way stock moves on commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    Purchase,
    Sales,
}

impl OrderKind {
    /// Purchases bring stock in; sales take it out
    pub fn stock_direction(self) -> StockDirection {
        match self {
            OrderKind::Purchase => StockDirection::Increase,
            OrderKind::Sales => StockDirection::Decrease,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_input(quantity: i64, item_price: Decimal, variant_quantity: i64) -> OrderLineInput {
        OrderLineInput {
            id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            quantity,
            item_price,
            variant: Some(VariantSnapshot {
                name: "case".to_string(),
                quantity: variant_quantity,
            }),
            warehouse_id: None,
        }
    }

    #[test]
    fn test_line_total_with_variant_multiplier() {
        // 100 units of a case-of-10 at 10 each
        let total = line_total(100, 10, Decimal::from(10));
        assert_eq!(total, Decimal::from(10_000));
    }

    #[test]
    fn test_compute_line_snapshots_variant() {
        let input = line_input(100, Decimal::from(10), 10);
        let line = OrderLine::compute(&input, None);
        assert_eq!(line.total_price, Decimal::from(10_000));
        assert_eq!(line.variant.quantity, 10);
        assert!(line.original_item_price.is_none());
    }

    #[test]
    fn test_compute_line_without_variant_uses_unit() {
        let mut input = line_input(3, Decimal::from(25), 1);
        input.variant = None;
        let line = OrderLine::compute(&input, None);
        assert_eq!(line.variant, VariantSnapshot::unit());
        assert_eq!(line.total_price, Decimal::from(75));
    }

    #[test]
    fn test_order_total_is_sum_of_lines() {
        let lines = vec![
            OrderLine::compute(&line_input(2, Decimal::from(50), 1), None),
            OrderLine::compute(&line_input(5, Decimal::from(10), 12), None),
        ];
        assert_eq!(order_total(&lines), Decimal::from(100 + 600));
    }

    #[test]
    fn test_stock_direction_per_kind() {
        assert_eq!(
            OrderKind::Purchase.stock_direction(),
            StockDirection::Increase
        );
        assert_eq!(OrderKind::Sales.stock_direction(), StockDirection::Decrease);
    }
}
