//! Order total computation tests
//!
//! Tests for line and order totals:
//! - totalPrice = quantity * variant.quantity * itemPrice
//! - order.total = sum of line totalPrice values
//! - recomputation on amendment

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use shared::models::{line_total, order_total, OrderLine, OrderLineInput, VariantSnapshot};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

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

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// 100 units of a case-of-10 at 10 each totals 10000
    #[test]
    fn test_purchase_line_total_example() {
        let line = OrderLine::compute(&line_input(100, dec("10"), 10), None);
        assert_eq!(line.total_price, dec("10000"));

        let total = order_total(&[line]);
        assert_eq!(total, dec("10000"));
    }

    /// Amending the quantity to 50 recomputes the total to 5000
    #[test]
    fn test_amended_line_total_example() {
        let line = OrderLine::compute(&line_input(50, dec("10"), 10), None);
        assert_eq!(line.total_price, dec("5000"));
        assert_eq!(order_total(&[line]), dec("5000"));
    }

    /// A missing variant means a multiplier of 1
    #[test]
    fn test_line_without_variant() {
        let mut input = line_input(3, dec("19.50"), 1);
        input.variant = None;
        let line = OrderLine::compute(&input, None);
        assert_eq!(line.variant.quantity, 1);
        assert_eq!(line.total_price, dec("58.50"));
    }

    #[test]
    fn test_order_total_sums_lines() {
        let lines = vec![
            OrderLine::compute(&line_input(2, dec("50"), 1), None),
            OrderLine::compute(&line_input(5, dec("10"), 12), None),
            OrderLine::compute(&line_input(1, dec("0.25"), 4), None),
        ];
        assert_eq!(order_total(&lines), dec("100") + dec("600") + dec("1"));
    }

    #[test]
    fn test_empty_order_total_is_zero() {
        assert_eq!(order_total(&[]), Decimal::ZERO);
    }

    /// Fractional unit prices keep exact decimal arithmetic
    #[test]
    fn test_fractional_prices_exact() {
        let line = OrderLine::compute(&line_input(3, dec("0.10"), 1), None);
        assert_eq!(line.total_price, dec("0.30"));
    }

    /// The original selling price rides along unchanged
    #[test]
    fn test_original_item_price_snapshot() {
        let line = OrderLine::compute(&line_input(4, dec("80"), 1), Some(dec("100")));
        assert_eq!(line.original_item_price, Some(dec("100")));
        // Totals use the negotiated item price, not the snapshot
        assert_eq!(line.total_price, dec("320"));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for valid quantities
    fn quantity_strategy() -> impl Strategy<Value = i64> {
        1i64..=10_000
    }

    /// Strategy for variant multipliers
    fn multiplier_strategy() -> impl Strategy<Value = i64> {
        1i64..=144
    }

    /// Strategy for unit prices (0.01 to 1000.00)
    fn price_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=100_000).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// line.totalPrice == quantity * variant.quantity * itemPrice, exactly
        #[test]
        fn prop_line_total_formula(
            quantity in quantity_strategy(),
            multiplier in multiplier_strategy(),
            price in price_strategy()
        ) {
            let line = OrderLine::compute(&line_input(quantity, price, multiplier), None);
            prop_assert_eq!(
                line.total_price,
                Decimal::from(quantity) * Decimal::from(multiplier) * price
            );
            prop_assert_eq!(line.total_price, line_total(quantity, multiplier, price));
        }

        /// order.total == sum of line totals, for any valid combination
        #[test]
        fn prop_order_total_is_sum(
            specs in prop::collection::vec(
                (quantity_strategy(), multiplier_strategy(), price_strategy()),
                1..12
            )
        ) {
            let lines: Vec<OrderLine> = specs
                .iter()
                .map(|(q, m, p)| OrderLine::compute(&line_input(*q, *p, *m), None))
                .collect();

            let expected: Decimal = lines.iter().map(|l| l.total_price).sum();
            prop_assert_eq!(order_total(&lines), expected);
        }

        /// Recomputation is pure: computing the same input twice agrees
        #[test]
        fn prop_recompute_is_deterministic(
            quantity in quantity_strategy(),
            multiplier in multiplier_strategy(),
            price in price_strategy()
        ) {
            let input = line_input(quantity, price, multiplier);
            let first = OrderLine::compute(&input, None);
            let second = OrderLine::compute(&input, None);
            prop_assert_eq!(first, second);
        }

        /// Totals are non-negative whenever the unit price is
        #[test]
        fn prop_total_non_negative(
            quantity in quantity_strategy(),
            multiplier in multiplier_strategy(),
            price in price_strategy()
        ) {
            let line = OrderLine::compute(&line_input(quantity, price, multiplier), None);
            prop_assert!(line.total_price >= Decimal::ZERO);
        }
    }
}
