//! Stock application and transfer tests
//!
//! Tests for:
//! - movement planning (direction, effective quantity, location)
//! - two-phase reconciliation on amendment (net effect is exactly the delta)
//! - transfer validation ordering and failure without side effects
//! - delta commutativity (concurrent commits cannot lose updates when
//!   applied as signed increments)

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashMap;
use uuid::Uuid;

use shared::models::{
    effective_quantity, plan_movements, validate_transfer_request, validate_transfer_stock,
    OrderKind, OrderLine, OrderLineInput, StockDirection, StockLocation, StockMovement,
    TransferError, VariantSnapshot,
};

fn line(
    product_id: Uuid,
    quantity: i64,
    variant_quantity: i64,
    warehouse_id: Option<Uuid>,
) -> OrderLine {
    OrderLine::compute(
        &OrderLineInput {
            id: Uuid::new_v4(),
            product_id,
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

// ============================================================================
// Simulation Helpers (mirror the storage-level atomic increments)
// ============================================================================

/// In-memory stand-in for the stock ledger: (product, location) -> stock.
/// Applying a movement is an unconditional signed increment, exactly like
/// the SQL `stock = stock + delta` the service issues.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct Ledger {
    entries: HashMap<(Uuid, StockLocation), i64>,
}

impl Ledger {
    fn apply(&mut self, movements: &[StockMovement]) {
        for m in movements {
            *self.entries.entry((m.product_id, m.location)).or_insert(0) += m.delta;
        }
    }

    fn stock(&self, product_id: Uuid, location: StockLocation) -> i64 {
        self.entries
            .get(&(product_id, location))
            .copied()
            .unwrap_or(0)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_effective_quantity() {
        assert_eq!(effective_quantity(100, 10), 1000);
        assert_eq!(effective_quantity(7, 1), 7);
    }

    /// Committing a purchase of 100 case-of-10 raises store stock by 1000
    #[test]
    fn test_purchase_commit_increases_store_stock() {
        let product = Uuid::new_v4();
        let lines = vec![line(product, 100, 10, None)];

        let mut ledger = Ledger::default();
        ledger.apply(&plan_movements(OrderKind::Purchase.stock_direction(), &lines));

        assert_eq!(ledger.stock(product, StockLocation::Store), 1000);
    }

    /// The same purchase against a warehouse raises that entry instead
    #[test]
    fn test_purchase_commit_increases_warehouse_stock() {
        let product = Uuid::new_v4();
        let warehouse = Uuid::new_v4();
        let lines = vec![line(product, 100, 10, Some(warehouse))];

        let mut ledger = Ledger::default();
        ledger.apply(&plan_movements(OrderKind::Purchase.stock_direction(), &lines));

        assert_eq!(ledger.stock(product, StockLocation::Warehouse(warehouse)), 1000);
        assert_eq!(ledger.stock(product, StockLocation::Store), 0);
    }

    /// Sales decrease, and stock goes negative rather than clamping
    #[test]
    fn test_sale_commit_decreases_and_allows_negative() {
        let product = Uuid::new_v4();
        let lines = vec![line(product, 5, 12, None)];

        let mut ledger = Ledger::default();
        ledger.apply(&plan_movements(OrderKind::Sales.stock_direction(), &lines));

        assert_eq!(ledger.stock(product, StockLocation::Store), -60);
    }

    /// Amending 100 -> 50 (variant 10) nets exactly -500, never
    /// double-applied or unapplied
    #[test]
    fn test_amendment_nets_exact_delta() {
        let product = Uuid::new_v4();
        let old_lines = vec![line(product, 100, 10, None)];
        let new_lines = vec![line(product, 50, 10, None)];

        let direction = OrderKind::Purchase.stock_direction();

        let mut ledger = Ledger::default();
        ledger.apply(&plan_movements(direction, &old_lines));
        assert_eq!(ledger.stock(product, StockLocation::Store), 1000);

        // Two-phase reconciliation: reverse then re-apply
        ledger.apply(&plan_movements(direction.opposite(), &old_lines));
        ledger.apply(&plan_movements(direction, &new_lines));

        assert_eq!(ledger.stock(product, StockLocation::Store), 500);
    }

    /// An amendment with identical lines is a net no-op
    #[test]
    fn test_amendment_with_unchanged_lines_is_noop() {
        let product = Uuid::new_v4();
        let lines = vec![line(product, 8, 6, None)];
        let direction = OrderKind::Sales.stock_direction();

        let mut ledger = Ledger::default();
        ledger.apply(&plan_movements(direction, &lines));
        let before = ledger.clone();

        ledger.apply(&plan_movements(direction.opposite(), &lines));
        ledger.apply(&plan_movements(direction, &lines));

        assert_eq!(ledger, before);
    }

    /// Amendments may move a line between locations
    #[test]
    fn test_amendment_moves_between_locations() {
        let product = Uuid::new_v4();
        let warehouse = Uuid::new_v4();
        let old_lines = vec![line(product, 10, 1, None)];
        let new_lines = vec![line(product, 10, 1, Some(warehouse))];
        let direction = OrderKind::Purchase.stock_direction();

        let mut ledger = Ledger::default();
        ledger.apply(&plan_movements(direction, &old_lines));
        ledger.apply(&plan_movements(direction.opposite(), &old_lines));
        ledger.apply(&plan_movements(direction, &new_lines));

        assert_eq!(ledger.stock(product, StockLocation::Store), 0);
        assert_eq!(ledger.stock(product, StockLocation::Warehouse(warehouse)), 10);
    }

    // ------------------------------------------------------------------------
    // Transfer validation
    // ------------------------------------------------------------------------

    #[test]
    fn test_transfer_validation_order() {
        let w = Uuid::new_v4();

        // Same location wins over a bad amount
        assert_eq!(
            validate_transfer_request(StockLocation::Store, StockLocation::Store, -5),
            Err(TransferError::SameLocation)
        );
        // Then the amount check
        assert_eq!(
            validate_transfer_request(StockLocation::Store, StockLocation::Warehouse(w), 0),
            Err(TransferError::NonPositiveAmount)
        );
        // Valid shape passes
        assert!(
            validate_transfer_request(StockLocation::Store, StockLocation::Warehouse(w), 5)
                .is_ok()
        );
    }

    #[test]
    fn test_transfer_error_messages() {
        assert_eq!(
            TransferError::SameLocation.message(),
            "Source is same as destination"
        );
        assert_eq!(TransferError::NonPositiveAmount.message(), "Must be greater than 0");
        assert_eq!(TransferError::SourceNotFound.message(), "Source not found");
        assert_eq!(
            TransferError::DestinationNotFound.message(),
            "Destination not found"
        );
        assert_eq!(
            TransferError::InsufficientStock.message(),
            "Transfer amount is greater than stored quantity"
        );
    }

    /// A failed transfer leaves both ends untouched
    #[test]
    fn test_failed_transfer_has_no_side_effects() {
        let product = Uuid::new_v4();
        let warehouse = Uuid::new_v4();

        let mut ledger = Ledger::default();
        ledger.apply(&[StockMovement {
            product_id: product,
            location: StockLocation::Store,
            delta: 30,
        }]);
        let before = ledger.clone();

        // 50 > 30: validation fails before any mutation would run
        let result = validate_transfer_stock(ledger.stock(product, StockLocation::Store), 50);
        assert_eq!(result, Err(TransferError::InsufficientStock));
        assert_eq!(ledger, before);
        assert_eq!(ledger.stock(product, StockLocation::Warehouse(warehouse)), 0);
    }

    /// A valid transfer moves exactly the amount
    #[test]
    fn test_transfer_moves_amount() {
        let product = Uuid::new_v4();
        let warehouse = Uuid::new_v4();
        let source = StockLocation::Store;
        let destination = StockLocation::Warehouse(warehouse);

        let mut ledger = Ledger::default();
        ledger.apply(&[StockMovement {
            product_id: product,
            location: source,
            delta: 30,
        }]);

        validate_transfer_request(source, destination, 20).unwrap();
        validate_transfer_stock(ledger.stock(product, source), 20).unwrap();
        ledger.apply(&[
            StockMovement {
                product_id: product,
                location: source,
                delta: -20,
            },
            StockMovement {
                product_id: product,
                location: destination,
                delta: 20,
            },
        ]);

        assert_eq!(ledger.stock(product, source), 10);
        assert_eq!(ledger.stock(product, destination), 20);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn quantity_strategy() -> impl Strategy<Value = i64> {
        1i64..=1_000
    }

    fn multiplier_strategy() -> impl Strategy<Value = i64> {
        1i64..=48
    }

    fn direction_strategy() -> impl Strategy<Value = StockDirection> {
        prop_oneof![
            Just(StockDirection::Increase),
            Just(StockDirection::Decrease)
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Reverse-then-apply always nets new - old, regardless of history
        #[test]
        fn prop_reconciliation_nets_delta(
            initial in 0i64..=100_000,
            old_qty in quantity_strategy(),
            new_qty in quantity_strategy(),
            multiplier in multiplier_strategy()
        ) {
            let product = Uuid::new_v4();
            let direction = StockDirection::Increase;

            let mut ledger = Ledger::default();
            ledger.apply(&[StockMovement {
                product_id: product,
                location: StockLocation::Store,
                delta: initial,
            }]);

            let old_lines = vec![line(product, old_qty, multiplier, None)];
            ledger.apply(&plan_movements(direction, &old_lines));

            let new_lines = vec![line(product, new_qty, multiplier, None)];
            ledger.apply(&plan_movements(direction.opposite(), &old_lines));
            ledger.apply(&plan_movements(direction, &new_lines));

            prop_assert_eq!(
                ledger.stock(product, StockLocation::Store),
                initial + new_qty * multiplier
            );
        }

        /// Signed increments commute: any interleaving of concurrent
        /// commits lands on the same final stock, so no update is lost
        #[test]
        fn prop_concurrent_deltas_commute(
            deltas in prop::collection::vec(
                (direction_strategy(), quantity_strategy(), multiplier_strategy()),
                1..20
            )
        ) {
            let product = Uuid::new_v4();

            let movements: Vec<StockMovement> = deltas
                .iter()
                .map(|(direction, qty, mult)| StockMovement {
                    product_id: product,
                    location: StockLocation::Store,
                    delta: direction.signed(effective_quantity(*qty, *mult)),
                })
                .collect();

            let mut forward = Ledger::default();
            forward.apply(&movements);

            let mut reversed_order = Ledger::default();
            let mut rev: Vec<StockMovement> = movements.clone();
            rev.reverse();
            reversed_order.apply(&rev);

            prop_assert_eq!(
                forward.stock(product, StockLocation::Store),
                reversed_order.stock(product, StockLocation::Store)
            );
        }

        /// Opposite movements cancel exactly
        #[test]
        fn prop_reversal_cancels(
            qty in quantity_strategy(),
            multiplier in multiplier_strategy(),
            direction in direction_strategy()
        ) {
            let product = Uuid::new_v4();
            let lines = vec![line(product, qty, multiplier, None)];

            let mut ledger = Ledger::default();
            ledger.apply(&plan_movements(direction, &lines));
            ledger.apply(&plan_movements(direction.opposite(), &lines));

            prop_assert_eq!(ledger.stock(product, StockLocation::Store), 0);
        }

        /// Transfers conserve total stock across the two locations
        #[test]
        fn prop_transfer_conserves_stock(
            source_stock in 0i64..=10_000,
            dest_stock in 0i64..=10_000,
            amount in 1i64..=10_000
        ) {
            let product = Uuid::new_v4();
            let warehouse = Uuid::new_v4();
            let source = StockLocation::Store;
            let destination = StockLocation::Warehouse(warehouse);

            let mut ledger = Ledger::default();
            ledger.apply(&[
                StockMovement { product_id: product, location: source, delta: source_stock },
                StockMovement { product_id: product, location: destination, delta: dest_stock },
            ]);

            let total_before =
                ledger.stock(product, source) + ledger.stock(product, destination);

            if validate_transfer_stock(source_stock, amount).is_ok() {
                ledger.apply(&[
                    StockMovement { product_id: product, location: source, delta: -amount },
                    StockMovement { product_id: product, location: destination, delta: amount },
                ]);
            }

            let total_after =
                ledger.stock(product, source) + ledger.stock(product, destination);
            prop_assert_eq!(total_before, total_after);
        }

        /// Movement planning covers every line, in order
        #[test]
        fn prop_one_movement_per_line(
            specs in prop::collection::vec(
                (quantity_strategy(), multiplier_strategy(), any::<bool>()),
                1..10
            ),
            direction in direction_strategy()
        ) {
            let warehouse = Uuid::new_v4();
            let lines: Vec<OrderLine> = specs
                .iter()
                .map(|(q, m, in_warehouse)| {
                    let location = in_warehouse.then_some(warehouse);
                    line(Uuid::new_v4(), *q, *m, location)
                })
                .collect();

            let movements = plan_movements(direction, &lines);
            prop_assert_eq!(movements.len(), lines.len());

            for (movement, l) in movements.iter().zip(lines.iter()) {
                prop_assert_eq!(movement.product_id, l.product_id);
                prop_assert_eq!(
                    movement.delta,
                    direction.signed(effective_quantity(l.quantity, l.variant.quantity))
                );
            }
        }
    }
}
