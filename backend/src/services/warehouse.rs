//! Warehouse registry service
//!
//! Warehouses are named stock locations holding per-product stock entries.
//! `set_stock` is the absolute upsert primitive for direct adjustment;
//! order flows go through the stock service's atomic delta application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::StockEntry;

/// Warehouse service for managing stock locations
#[derive(Clone)]
pub struct WarehouseService {
    db: PgPool,
}

/// Warehouse record
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Warehouse {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stock entry with its product resolved for presentation
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct WarehouseStockEntry {
    pub product_id: Uuid,
    pub product_name: String,
    pub sku: String,
    pub stock: i64,
}

/// Warehouse with its stock entries materialized
#[derive(Debug, Clone, Serialize)]
pub struct WarehouseWithStock {
    #[serde(flatten)]
    pub warehouse: Warehouse,
    pub stock: Vec<WarehouseStockEntry>,
}

/// Input for creating a warehouse
#[derive(Debug, Deserialize)]
pub struct CreateWarehouseInput {
    pub name: String,
}

/// Input for renaming a warehouse
#[derive(Debug, Deserialize)]
pub struct UpdateWarehouseInput {
    pub name: String,
}

/// Input for the absolute stock upsert
#[derive(Debug, Deserialize)]
pub struct SetStockInput {
    pub product_id: Uuid,
    pub stock: i64,
}

impl WarehouseService {
    /// Create a new WarehouseService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a warehouse with an empty stock-entry list
    pub async fn create_warehouse(&self, input: CreateWarehouseInput) -> AppResult<Warehouse> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "name is required".to_string(),
                message_th: "ต้องระบุ name".to_string(),
            });
        }

        self.ensure_name_available(&input.name, None).await?;

        let warehouse = sqlx::query_as::<_, Warehouse>(
            r#"
            INSERT INTO warehouses (name)
            VALUES ($1)
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .fetch_one(&self.db)
        .await?;

        Ok(warehouse)
    }

    /// Rename a warehouse
    pub async fn update_warehouse(
        &self,
        warehouse_id: Uuid,
        input: UpdateWarehouseInput,
    ) -> AppResult<Warehouse> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "name is required".to_string(),
                message_th: "ต้องระบุ name".to_string(),
            });
        }

        self.ensure_name_available(&input.name, Some(warehouse_id))
            .await?;

        let warehouse = sqlx::query_as::<_, Warehouse>(
            r#"
            UPDATE warehouses
            SET name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(warehouse_id)
        .bind(&input.name)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Warehouse".to_string()))?;

        Ok(warehouse)
    }

    /// Get a warehouse with its stock entries
    pub async fn get_warehouse(&self, warehouse_id: Uuid) -> AppResult<WarehouseWithStock> {
        let warehouse = self.fetch_warehouse(warehouse_id).await?;
        let stock = self.fetch_stock_entries(warehouse_id).await?;
        Ok(WarehouseWithStock { warehouse, stock })
    }

    /// List all warehouses
    pub async fn list_warehouses(&self) -> AppResult<Vec<Warehouse>> {
        let warehouses = sqlx::query_as::<_, Warehouse>(
            "SELECT id, name, created_at, updated_at FROM warehouses ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(warehouses)
    }

    /// The stock entry for a product, or None if the warehouse never held it
    pub async fn get_stock_entry(
        &self,
        warehouse_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<Option<StockEntry>> {
        self.fetch_warehouse(warehouse_id).await?;

        let stock = sqlx::query_scalar::<_, i64>(
            "SELECT stock FROM warehouse_stocks WHERE warehouse_id = $1 AND product_id = $2",
        )
        .bind(warehouse_id)
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(stock.map(|stock| StockEntry { product_id, stock }))
    }

    /// Absolute upsert of a stock entry: appends the entry if the product
    /// has none yet, otherwise overwrites the stored value.
    pub async fn set_stock(
        &self,
        warehouse_id: Uuid,
        input: SetStockInput,
    ) -> AppResult<StockEntry> {
        self.fetch_warehouse(warehouse_id).await?;

        let product_exists = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM products WHERE id = $1 AND archived = FALSE",
        )
        .bind(input.product_id)
        .fetch_one(&self.db)
        .await?;

        if product_exists == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }

        let stock = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO warehouse_stocks (warehouse_id, product_id, stock)
            VALUES ($1, $2, $3)
            ON CONFLICT (warehouse_id, product_id)
            DO UPDATE SET stock = EXCLUDED.stock
            RETURNING stock
            "#,
        )
        .bind(warehouse_id)
        .bind(input.product_id)
        .bind(input.stock)
        .fetch_one(&self.db)
        .await?;

        Ok(StockEntry {
            product_id: input.product_id,
            stock,
        })
    }

    async fn fetch_warehouse(&self, warehouse_id: Uuid) -> AppResult<Warehouse> {
        sqlx::query_as::<_, Warehouse>(
            "SELECT id, name, created_at, updated_at FROM warehouses WHERE id = $1",
        )
        .bind(warehouse_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Warehouse".to_string()))
    }

    async fn fetch_stock_entries(&self, warehouse_id: Uuid) -> AppResult<Vec<WarehouseStockEntry>> {
        let entries = sqlx::query_as::<_, WarehouseStockEntry>(
            r#"
            SELECT ws.product_id, p.name AS product_name, p.sku, ws.stock
            FROM warehouse_stocks ws
            JOIN products p ON p.id = ws.product_id
            WHERE ws.warehouse_id = $1
            ORDER BY p.name
            "#,
        )
        .bind(warehouse_id)
        .fetch_all(&self.db)
        .await?;

        Ok(entries)
    }

    /// Warehouse names are unique
    async fn ensure_name_available(&self, name: &str, exclude: Option<Uuid>) -> AppResult<()> {
        let existing = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM warehouses
            WHERE name = $1 AND ($2::uuid IS NULL OR id <> $2)
            "#,
        )
        .bind(name)
        .bind(exclude)
        .fetch_one(&self.db)
        .await?;

        if existing > 0 {
            return Err(AppError::DuplicateEntry("warehouse name".to_string()));
        }

        Ok(())
    }
}
