//! Stock application and transfer
//!
//! All order-driven stock mutation funnels through [`apply_movements`],
//! which uses storage-level atomic increments so two concurrent commits
//! against the same (product, location) entry cannot lose updates.

use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::product::Product;
use shared::models::{
    validate_transfer_request, validate_transfer_stock, StockLocation, StockMovement,
    TransferError,
};

/// Stock service for transfers and per-product stock views
#[derive(Clone)]
pub struct StockService {
    db: PgPool,
}

/// Input for moving stock between two locations
#[derive(Debug, Deserialize)]
pub struct TransferInput {
    pub source: StockLocation,
    pub destination: StockLocation,
    pub product_id: Uuid,
    pub amount: i64,
}

/// A product's stock entry at one warehouse, with the warehouse resolved
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductWarehouseStock {
    pub warehouse_id: Uuid,
    pub warehouse_name: String,
    pub stock: i64,
}

/// A product with its stock at every location
#[derive(Debug, Clone, Serialize)]
pub struct ProductStockView {
    #[serde(flatten)]
    pub product: Product,
    pub warehouse_stock: Vec<ProductWarehouseStock>,
}

/// Execute planned stock movements sequentially inside the caller's
/// transaction, stopping at the first failure. Earlier movements are not
/// undone here; the enclosing transaction rolls everything back.
///
/// Store-level movements adjust the product's stock column; warehouse
/// movements upsert the (warehouse, product) entry, created at the delta
/// when absent. Values are never clamped: negative stock is a meaningful
/// back-order/oversell signal.
pub(crate) async fn apply_movements(
    tx: &mut Transaction<'_, Postgres>,
    movements: &[StockMovement],
) -> AppResult<()> {
    for movement in movements {
        match movement.location {
            StockLocation::Store => {
                let result = sqlx::query(
                    "UPDATE products SET stock = stock + $1, updated_at = NOW() WHERE id = $2",
                )
                .bind(movement.delta)
                .bind(movement.product_id)
                .execute(&mut **tx)
                .await?;

                if result.rows_affected() == 0 {
                    return Err(AppError::NotFound("Product".to_string()));
                }
            }
            StockLocation::Warehouse(warehouse_id) => {
                sqlx::query(
                    r#"
                    INSERT INTO warehouse_stocks (warehouse_id, product_id, stock)
                    VALUES ($1, $2, $3)
                    ON CONFLICT (warehouse_id, product_id)
                    DO UPDATE SET stock = warehouse_stocks.stock + EXCLUDED.stock
                    "#,
                )
                .bind(warehouse_id)
                .bind(movement.product_id)
                .bind(movement.delta)
                .execute(&mut **tx)
                .await?;
            }
        }
    }

    Ok(())
}

impl StockService {
    /// Create a new StockService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Move stock between two locations. Every validation runs before any
    /// write; the two adjustments commit atomically or not at all.
    pub async fn transfer(&self, input: TransferInput) -> AppResult<ProductStockView> {
        validate_transfer_request(input.source, input.destination, input.amount)?;

        let product = self.fetch_product(input.product_id).await?;

        let source_stock = self
            .resolve_location_stock(input.source, &product, TransferError::SourceNotFound)
            .await?;
        self.resolve_location_stock(
            input.destination,
            &product,
            TransferError::DestinationNotFound,
        )
        .await?;

        validate_transfer_stock(source_stock, input.amount)?;

        let movements = [
            StockMovement {
                product_id: input.product_id,
                location: input.source,
                delta: -input.amount,
            },
            StockMovement {
                product_id: input.product_id,
                location: input.destination,
                delta: input.amount,
            },
        ];

        let mut tx = self.db.begin().await?;
        apply_movements(&mut tx, &movements).await?;
        tx.commit().await?;

        tracing::info!(
            product_id = %input.product_id,
            source = %input.source,
            destination = %input.destination,
            amount = input.amount,
            "Stock transferred"
        );

        self.product_stock_view(input.product_id).await
    }

    /// A product with its store stock and every warehouse entry
    pub async fn product_stock_view(&self, product_id: Uuid) -> AppResult<ProductStockView> {
        let product = self.fetch_product(product_id).await?;

        let warehouse_stock = sqlx::query_as::<_, ProductWarehouseStock>(
            r#"
            SELECT ws.warehouse_id, w.name AS warehouse_name, ws.stock
            FROM warehouse_stocks ws
            JOIN warehouses w ON w.id = ws.warehouse_id
            WHERE ws.product_id = $1
            ORDER BY w.name
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        Ok(ProductStockView {
            product,
            warehouse_stock,
        })
    }

    /// Current stock at a location; a warehouse that never held the product
    /// reads as zero, a missing warehouse is the given resolution error.
    async fn resolve_location_stock(
        &self,
        location: StockLocation,
        product: &Product,
        missing: TransferError,
    ) -> AppResult<i64> {
        match location {
            StockLocation::Store => Ok(product.stock),
            StockLocation::Warehouse(warehouse_id) => {
                let exists =
                    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM warehouses WHERE id = $1")
                        .bind(warehouse_id)
                        .fetch_one(&self.db)
                        .await?;

                if exists == 0 {
                    return Err(missing.into());
                }

                let stock = sqlx::query_scalar::<_, i64>(
                    "SELECT stock FROM warehouse_stocks WHERE warehouse_id = $1 AND product_id = $2",
                )
                .bind(warehouse_id)
                .bind(product.id)
                .fetch_optional(&self.db)
                .await?;

                Ok(stock.unwrap_or(0))
            }
        }
    }

    async fn fetch_product(&self, product_id: Uuid) -> AppResult<Product> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, company, category, sub_category, selling_price, cost_price,
                   sku, stock, reorder_point, published, archived, created_at, updated_at
            FROM products
            WHERE id = $1 AND archived = FALSE
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))
    }
}
