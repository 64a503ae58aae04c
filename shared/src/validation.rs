//! Validation utilities for the Inventory & Order Management Platform
//!
//! Field-level checks accumulate into [`FieldErrors`] so one response can
//! report every offending field at once.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::OrderLineInput;

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    pub message_th: String,
}

/// Collects field failures across a whole input before reporting
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        field: impl Into<String>,
        message: impl Into<String>,
        message_th: impl Into<String>,
    ) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
            message_th: message_th.into(),
        });
    }

    /// Text field must be present and non-blank
    pub fn require_text(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(
                field,
                format!("{} is required", field),
                format!("ต้องระบุ {}", field),
            );
        }
    }

    /// Price field must not be negative
    pub fn require_non_negative_price(&mut self, field: &str, value: Decimal) {
        if value < Decimal::ZERO {
            self.push(
                field,
                format!("{} cannot be negative", field),
                format!("{} ต้องไม่ติดลบ", field),
            );
        }
    }

    /// Count field must not be negative
    pub fn require_non_negative(&mut self, field: &str, value: i64) {
        if value < 0 {
            self.push(
                field,
                format!("{} cannot be negative", field),
                format!("{} ต้องไม่ติดลบ", field),
            );
        }
    }

    /// Count field must be strictly positive
    pub fn require_positive(&mut self, field: &str, value: i64) {
        if value <= 0 {
            self.push(
                field,
                format!("{} must be greater than 0", field),
                format!("{} ต้องมากกว่า 0", field),
            );
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }
}

/// Validate every line of an order in one pass, indexing fields as
/// `products[i].*`. An empty list is itself a field failure.
pub fn validate_order_lines(lines: &[OrderLineInput], errors: &mut FieldErrors) {
    if lines.is_empty() {
        errors.push(
            "products",
            "At least one line item is required",
            "ต้องมีรายการสินค้าอย่างน้อย 1 รายการ",
        );
        return;
    }
    for (i, line) in lines.iter().enumerate() {
        errors.require_positive(&format!("products[{}].quantity", i), line.quantity);
        errors.require_non_negative_price(
            &format!("products[{}].item_price", i),
            line.item_price,
        );
        if let Some(variant) = &line.variant {
            errors.require_positive(
                &format!("products[{}].variant.quantity", i),
                variant.quantity,
            );
        }
    }
}

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}

/// Validate a client-supplied SKU (4-16 uppercase alphanumeric characters)
pub fn validate_sku(sku: &str) -> Result<(), &'static str> {
    if sku.len() < 4 {
        return Err("SKU must be at least 4 characters");
    }
    if sku.len() > 16 {
        return Err("SKU must be at most 16 characters");
    }
    if !sku
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    {
        return Err("SKU must be uppercase alphanumeric only");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VariantSnapshot;
    use uuid::Uuid;

    fn line(quantity: i64, item_price: Decimal, variant_quantity: Option<i64>) -> OrderLineInput {
        OrderLineInput {
            id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            quantity,
            item_price,
            variant: variant_quantity.map(|q| VariantSnapshot {
                name: "case".to_string(),
                quantity: q,
            }),
            warehouse_id: None,
        }
    }

    #[test]
    fn test_require_text() {
        let mut errors = FieldErrors::new();
        errors.require_text("name", "Arabica beans");
        assert!(errors.is_empty());
        errors.require_text("company", "   ");
        assert_eq!(errors.errors().len(), 1);
        assert_eq!(errors.errors()[0].field, "company");
    }

    #[test]
    fn test_collects_every_offending_field() {
        let mut errors = FieldErrors::new();
        errors.require_text("name", "");
        errors.require_non_negative_price("selling_price", Decimal::from(-1));
        errors.require_non_negative("reorder_point", -5);
        let fields: Vec<&str> = errors.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "selling_price", "reorder_point"]);
    }

    #[test]
    fn test_empty_line_list_is_a_field_error() {
        let mut errors = FieldErrors::new();
        validate_order_lines(&[], &mut errors);
        assert_eq!(errors.errors().len(), 1);
        assert_eq!(errors.errors()[0].field, "products");
    }

    #[test]
    fn test_line_validation_reports_all_lines() {
        let mut errors = FieldErrors::new();
        let lines = vec![
            line(0, Decimal::from(10), None),
            line(5, Decimal::from(-2), Some(0)),
        ];
        validate_order_lines(&lines, &mut errors);
        let fields: Vec<&str> = errors.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "products[0].quantity",
                "products[1].item_price",
                "products[1].variant.quantity",
            ]
        );
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("test@example.com").is_ok());
        assert!(validate_email("invalid").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("password123").is_ok());
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku("A1B2C3D4").is_ok());
        assert!(validate_sku("AB1").is_err()); // too short
        assert!(validate_sku("ABCDEFGHIJKLMNOPQ").is_err()); // too long
        assert!(validate_sku("abcd1234").is_err()); // lowercase
    }
}
