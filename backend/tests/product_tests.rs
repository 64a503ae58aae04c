//! Product catalog tests
//!
//! Tests for:
//! - SKU generation format
//! - price-change detection (the revision trigger)
//! - field validation collecting every offending field at once

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::models::{generate_sku, is_price_change, DEFAULT_VARIANT_NAME};
use shared::validation::{validate_sku, FieldErrors};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Generated SKUs are 8 uppercase hex characters
    #[test]
    fn test_generated_sku_shape() {
        for _ in 0..50 {
            let sku = generate_sku();
            assert_eq!(sku.len(), 8);
            assert!(sku.chars().all(|c| c.is_ascii_digit()
                || ('A'..='F').contains(&c)));
        }
    }

    /// Generated SKUs pass the client-supplied SKU validation
    #[test]
    fn test_generated_sku_is_valid() {
        assert!(validate_sku(&generate_sku()).is_ok());
    }

    #[test]
    fn test_default_variant_name() {
        assert_eq!(DEFAULT_VARIANT_NAME, "default");
    }

    /// Only a differing price field triggers a revision
    #[test]
    fn test_revision_trigger() {
        let selling = dec("100.00");
        let cost = dec("60.00");

        assert!(!is_price_change(selling, cost, None, None));
        assert!(!is_price_change(selling, cost, Some(selling), None));
        assert!(!is_price_change(selling, cost, None, Some(cost)));
        assert!(!is_price_change(selling, cost, Some(selling), Some(cost)));

        assert!(is_price_change(selling, cost, Some(dec("120.00")), None));
        assert!(is_price_change(selling, cost, None, Some(dec("55.00"))));
        assert!(is_price_change(
            selling,
            cost,
            Some(dec("120.00")),
            Some(dec("55.00"))
        ));
    }

    /// Every offending field shows up in one validation pass
    #[test]
    fn test_create_validation_collects_all_fields() {
        let mut errors = FieldErrors::new();
        errors.require_text("name", "");
        errors.require_text("company", "  ");
        errors.require_text("category", "Beverages");
        errors.require_non_negative_price("selling_price", dec("-1"));
        errors.require_non_negative_price("cost_price", dec("5"));
        errors.require_non_negative("reorder_point", -3);

        let fields: Vec<&str> = errors.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["name", "company", "selling_price", "reorder_point"]
        );
    }

    /// Field errors carry both languages
    #[test]
    fn test_field_errors_bilingual() {
        let mut errors = FieldErrors::new();
        errors.require_positive("quantity", 0);

        let error = &errors.errors()[0];
        assert_eq!(error.message, "quantity must be greater than 0");
        assert!(!error.message_th.is_empty());
    }

    #[test]
    fn test_sku_validation_rules() {
        assert!(validate_sku("A1B2C3D4").is_ok());
        assert!(validate_sku("SKU1").is_ok());
        assert!(validate_sku("AB1").is_err());
        assert!(validate_sku("abcd1234").is_err());
        assert!(validate_sku("WITH-DASH").is_err());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn price_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=10_000_000).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Supplying the stored prices back is never a revision
        #[test]
        fn prop_same_price_is_not_a_change(
            selling in price_strategy(),
            cost in price_strategy()
        ) {
            prop_assert!(!is_price_change(selling, cost, Some(selling), Some(cost)));
        }

        /// Any differing selling price is a revision
        #[test]
        fn prop_different_selling_price_is_a_change(
            selling in price_strategy(),
            cost in price_strategy(),
            bump in (1i64..=1_000).prop_map(|n| Decimal::new(n, 2))
        ) {
            prop_assert!(is_price_change(selling, cost, Some(selling + bump), None));
        }

        /// Generated SKUs always validate and always have 8 characters
        #[test]
        fn prop_generated_skus_valid(_seed in 0u8..255) {
            let sku = generate_sku();
            prop_assert_eq!(sku.len(), 8);
            prop_assert!(validate_sku(&sku).is_ok());
        }
    }
}
