//! Product catalog service
//!
//! Owns product identity, pricing, SKU, and archival. Price history is
//! immutable: a price change archives the current record and inserts a
//! revision under a new id, re-pointing warehouse stock and variants.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::variant::Variant;
use shared::models::{generate_sku, is_price_change, DEFAULT_VARIANT_NAME};
use shared::validation::{validate_sku, FieldErrors};

/// Product service for catalog management
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// Product record
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub company: String,
    pub category: String,
    pub sub_category: Option<String>,
    pub selling_price: Decimal,
    pub cost_price: Decimal,
    pub sku: String,
    /// Store-level stock, held outside any warehouse
    pub stock: i64,
    pub reorder_point: i64,
    pub published: bool,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product with its variants materialized
#[derive(Debug, Clone, Serialize)]
pub struct ProductWithVariants {
    #[serde(flatten)]
    pub product: Product,
    pub variants: Vec<Variant>,
}

/// Input for creating a product
#[derive(Debug, Deserialize)]
pub struct CreateProductInput {
    pub name: String,
    pub company: String,
    pub category: String,
    pub sub_category: Option<String>,
    pub selling_price: Decimal,
    pub cost_price: Decimal,
    pub sku: Option<String>,
    pub stock: Option<i64>,
    pub reorder_point: Option<i64>,
    pub published: Option<bool>,
}

/// Input for updating a product
#[derive(Debug, Deserialize)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub company: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub selling_price: Option<Decimal>,
    pub cost_price: Option<Decimal>,
    pub sku: Option<String>,
    pub reorder_point: Option<i64>,
    pub published: Option<bool>,
}

const PRODUCT_COLUMNS: &str = "id, name, company, category, sub_category, selling_price, \
     cost_price, sku, stock, reorder_point, published, archived, created_at, updated_at";

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a product together with its synthetic "default" variant
    pub async fn create_product(&self, input: CreateProductInput) -> AppResult<ProductWithVariants> {
        let mut errors = FieldErrors::new();
        errors.require_text("name", &input.name);
        errors.require_text("company", &input.company);
        errors.require_text("category", &input.category);
        errors.require_non_negative_price("selling_price", input.selling_price);
        errors.require_non_negative_price("cost_price", input.cost_price);
        if let Some(stock) = input.stock {
            errors.require_non_negative("stock", stock);
        }
        if let Some(reorder_point) = input.reorder_point {
            errors.require_non_negative("reorder_point", reorder_point);
        }
        if let Some(sku) = &input.sku {
            if let Err(msg) = validate_sku(sku) {
                errors.push("sku", msg, format!("รูปแบบ SKU ไม่ถูกต้อง: {}", msg));
            }
        }
        if !errors.is_empty() {
            return Err(errors.into());
        }

        let sku = input.sku.unwrap_or_else(generate_sku);

        self.ensure_name_sku_available(&input.name, &sku, None)
            .await?;

        let mut tx = self.db.begin().await?;

        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (name, company, category, sub_category, selling_price,
                                  cost_price, sku, stock, reorder_point, published)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(&input.name)
        .bind(&input.company)
        .bind(&input.category)
        .bind(&input.sub_category)
        .bind(input.selling_price)
        .bind(input.cost_price)
        .bind(&sku)
        .bind(input.stock.unwrap_or(0))
        .bind(input.reorder_point.unwrap_or(0))
        .bind(input.published.unwrap_or(false))
        .fetch_one(&mut *tx)
        .await?;

        // Every product carries a unit variant so line items without an
        // explicit variant still have a multiplier of 1
        let default_variant = sqlx::query_as::<_, Variant>(
            r#"
            INSERT INTO variants (product_id, name, quantity)
            VALUES ($1, $2, 1)
            RETURNING id, product_id, name, quantity, created_at
            "#,
        )
        .bind(product.id)
        .bind(DEFAULT_VARIANT_NAME)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(product_id = %product.id, sku = %product.sku, "Product created");

        Ok(ProductWithVariants {
            product,
            variants: vec![default_variant],
        })
    }

    /// Update a product. A change to either price field forks a revision;
    /// everything else mutates in place.
    pub async fn update_product(
        &self,
        product_id: Uuid,
        input: UpdateProductInput,
    ) -> AppResult<ProductWithVariants> {
        let existing = self.fetch_product(product_id).await?;

        let mut errors = FieldErrors::new();
        if let Some(name) = &input.name {
            errors.require_text("name", name);
        }
        if let Some(company) = &input.company {
            errors.require_text("company", company);
        }
        if let Some(category) = &input.category {
            errors.require_text("category", category);
        }
        if let Some(selling_price) = input.selling_price {
            errors.require_non_negative_price("selling_price", selling_price);
        }
        if let Some(cost_price) = input.cost_price {
            errors.require_non_negative_price("cost_price", cost_price);
        }
        if let Some(reorder_point) = input.reorder_point {
            errors.require_non_negative("reorder_point", reorder_point);
        }
        if let Some(sku) = &input.sku {
            if let Err(msg) = validate_sku(sku) {
                errors.push("sku", msg, format!("รูปแบบ SKU ไม่ถูกต้อง: {}", msg));
            }
        }
        if !errors.is_empty() {
            return Err(errors.into());
        }

        let name = input.name.clone().unwrap_or_else(|| existing.name.clone());
        let sku = input.sku.clone().unwrap_or_else(|| existing.sku.clone());
        self.ensure_name_sku_available(&name, &sku, Some(product_id))
            .await?;

        if is_price_change(
            existing.selling_price,
            existing.cost_price,
            input.selling_price,
            input.cost_price,
        ) {
            return self.revise_product(&existing, &input).await;
        }

        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET name = $2, company = $3, category = $4, sub_category = $5,
                sku = $6, reorder_point = $7, published = $8, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(product_id)
        .bind(&name)
        .bind(input.company.unwrap_or(existing.company))
        .bind(input.category.unwrap_or(existing.category))
        .bind(input.sub_category.or(existing.sub_category))
        .bind(&sku)
        .bind(input.reorder_point.unwrap_or(existing.reorder_point))
        .bind(input.published.unwrap_or(existing.published))
        .fetch_one(&self.db)
        .await?;

        let variants = self.fetch_variants(product_id).await?;

        Ok(ProductWithVariants { product, variants })
    }

    /// Fork a revision: archive the current record, insert a clone carrying
    /// the merged fields under a new id, and re-point warehouse stock
    /// entries and variants to the new id. Stock quantities are preserved
    /// exactly. All of it one transaction.
    async fn revise_product(
        &self,
        existing: &Product,
        input: &UpdateProductInput,
    ) -> AppResult<ProductWithVariants> {
        let mut tx = self.db.begin().await?;

        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (name, company, category, sub_category, selling_price,
                                  cost_price, sku, stock, reorder_point, published)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(input.name.clone().unwrap_or_else(|| existing.name.clone()))
        .bind(
            input
                .company
                .clone()
                .unwrap_or_else(|| existing.company.clone()),
        )
        .bind(
            input
                .category
                .clone()
                .unwrap_or_else(|| existing.category.clone()),
        )
        .bind(input.sub_category.clone().or(existing.sub_category.clone()))
        .bind(input.selling_price.unwrap_or(existing.selling_price))
        .bind(input.cost_price.unwrap_or(existing.cost_price))
        .bind(input.sku.clone().unwrap_or_else(|| existing.sku.clone()))
        .bind(existing.stock)
        .bind(input.reorder_point.unwrap_or(existing.reorder_point))
        .bind(input.published.unwrap_or(existing.published))
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE products SET archived = TRUE, updated_at = NOW() WHERE id = $1")
            .bind(existing.id)
            .execute(&mut *tx)
            .await?;

        // Warehouse entries follow the revision, stock preserved exactly
        sqlx::query("UPDATE warehouse_stocks SET product_id = $2 WHERE product_id = $1")
            .bind(existing.id)
            .bind(product.id)
            .execute(&mut *tx)
            .await?;

        // Variants follow too; historical order lines keep their snapshots
        sqlx::query("UPDATE variants SET product_id = $2 WHERE product_id = $1")
            .bind(existing.id)
            .bind(product.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            old_product_id = %existing.id,
            new_product_id = %product.id,
            "Product revised on price change"
        );

        let variants = self.fetch_variants(product.id).await?;

        Ok(ProductWithVariants { product, variants })
    }

    /// Get a product with its variants
    pub async fn get_product(&self, product_id: Uuid) -> AppResult<ProductWithVariants> {
        let product = self.fetch_product(product_id).await?;
        let variants = self.fetch_variants(product_id).await?;
        Ok(ProductWithVariants { product, variants })
    }

    /// List live products
    pub async fn list_products(&self) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE archived = FALSE ORDER BY created_at DESC",
            PRODUCT_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(products)
    }

    /// List live products at or below their reorder point
    pub async fn list_low_stock(&self) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE archived = FALSE AND stock <= reorder_point \
             ORDER BY stock",
            PRODUCT_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(products)
    }

    /// Soft-delete a product. Orders referencing it keep their references.
    pub async fn delete_product(&self, product_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE products SET archived = TRUE, updated_at = NOW() \
             WHERE id = $1 AND archived = FALSE",
        )
        .bind(product_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }

        Ok(())
    }

    /// Fetch a live product row
    async fn fetch_product(&self, product_id: Uuid) -> AppResult<Product> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE id = $1 AND archived = FALSE",
            PRODUCT_COLUMNS
        ))
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))
    }

    async fn fetch_variants(&self, product_id: Uuid) -> AppResult<Vec<Variant>> {
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

    /// (name, sku) must be unique among live products
    async fn ensure_name_sku_available(
        &self,
        name: &str,
        sku: &str,
        exclude: Option<Uuid>,
    ) -> AppResult<()> {
        let existing = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM products
            WHERE name = $1 AND sku = $2 AND archived = FALSE
              AND ($3::uuid IS NULL OR id <> $3)
            "#,
        )
        .bind(name)
        .bind(sku)
        .bind(exclude)
        .fetch_one(&self.db)
        .await?;

        if existing > 0 {
            return Err(AppError::Conflict {
                resource: "product".to_string(),
                message: "A product with this name and SKU already exists".to_string(),
                message_th: "มีสินค้าชื่อและ SKU นี้อยู่แล้ว".to_string(),
            });
        }

        Ok(())
    }
}
