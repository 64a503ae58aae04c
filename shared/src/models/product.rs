//! Product catalog rules shared between services and tests

use rust_decimal::Decimal;
use uuid::Uuid;

/// Name of the unit variant created automatically with every product
pub const DEFAULT_VARIANT_NAME: &str = "default";

/// Generate a SKU: 8 uppercase hex characters
pub fn generate_sku() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_uppercase()
}

/// Whether an update forks a new product revision: true when either price
/// field is supplied with a value different from the stored one. Price
/// history is immutable, so such updates archive-and-clone instead of
/// mutating in place.
pub fn is_price_change(
    current_selling: Decimal,
    current_cost: Decimal,
    new_selling: Option<Decimal>,
    new_cost: Option<Decimal>,
) -> bool {
    new_selling.map_or(false, |p| p != current_selling)
        || new_cost.map_or(false, |p| p != current_cost)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_sku_format() {
        let sku = generate_sku();
        assert_eq!(sku.len(), 8);
        assert!(sku
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn test_generated_skus_differ() {
        assert_ne!(generate_sku(), generate_sku());
    }

    #[test]
    fn test_price_change_detection() {
        let selling = Decimal::from(100);
        let cost = Decimal::from(60);

        // No price fields supplied
        assert!(!is_price_change(selling, cost, None, None));
        // Same values are not a change
        assert!(!is_price_change(selling, cost, Some(selling), Some(cost)));
        // Either field differing is a change
        assert!(is_price_change(selling, cost, Some(Decimal::from(120)), None));
        assert!(is_price_change(selling, cost, None, Some(Decimal::from(55))));
    }
}
