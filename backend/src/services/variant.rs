//! Variant registry service
//!
//! Variants are named quantity multipliers attached to a product
//! (e.g. "case of 12"). Creation and attachment run in one transaction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::validation::FieldErrors;

/// Variant service for managing product variants
#[derive(Clone)]
pub struct VariantService {
    db: PgPool,
}

/// Variant record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Variant {
    pub id: Uuid,
    pub product_id: Uuid,
    pub name: String,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a variant
#[derive(Debug, Deserialize)]
pub struct CreateVariantInput {
    pub product_id: Uuid,
    pub name: String,
    pub quantity: i64,
}

impl VariantService {
    /// Create a new VariantService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a variant and attach it to its product in one transaction
    pub async fn create_variant(&self, input: CreateVariantInput) -> AppResult<Variant> {
        let mut errors = FieldErrors::new();
        errors.require_text("name", &input.name);
        errors.require_positive("quantity", input.quantity);
        if !errors.is_empty() {
            return Err(errors.into());
        }

        let mut tx = self.db.begin().await?;

        // Product must exist and be live
        let product_exists = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM products WHERE id = $1 AND archived = FALSE",
        )
        .bind(input.product_id)
        .fetch_one(&mut *tx)
        .await?;

        if product_exists == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }

        // (product, name) must be unique
        let duplicate = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM variants WHERE product_id = $1 AND name = $2",
        )
        .bind(input.product_id)
        .bind(&input.name)
        .fetch_one(&mut *tx)
        .await?;

        if duplicate > 0 {
            return Err(AppError::Conflict {
                resource: "variant".to_string(),
                message: "This variant already exists for this product".to_string(),
                message_th: "มีตัวเลือกสินค้านี้อยู่แล้ว".to_string(),
            });
        }

        let variant = sqlx::query_as::<_, Variant>(
            r#"
            INSERT INTO variants (product_id, name, quantity)
            VALUES ($1, $2, $3)
            RETURNING id, product_id, name, quantity, created_at
            "#,
        )
        .bind(input.product_id)
        .bind(&input.name)
        .bind(input.quantity)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(variant)
    }

    /// List the variants of a product
    pub async fn get_variants(&self, product_id: Uuid) -> AppResult<Vec<Variant>> {
        let product_exists = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM products WHERE id = $1 AND archived = FALSE",
        )
        .bind(product_id)
        .fetch_one(&self.db)
        .await?;

        if product_exists == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }

        let variants = sqlx::query_as::<_, Variant>(
            r#"
            SELECT id, product_id, name, quantity, created_at
            FROM variants
            WHERE product_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        Ok(variants)
    }

    /// Delete a variant. Detachment from the product is the row removal
    /// itself; historical order lines keep their variant snapshots.
    pub async fn delete_variant(&self, variant_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM variants WHERE id = $1")
            .bind(variant_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Variant".to_string()));
        }

        Ok(())
    }
}
