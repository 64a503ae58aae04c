//! Purchase order service
//!
//! Computes line and order totals, persists orders, and drives stock
//! application. A committed purchase increases stock at each line's
//! location; amendments reverse the old effect and apply the new one
//! inside the same transaction.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::config::OrdersConfig;
use crate::error::{AppError, AppResult};
use crate::services::stock::apply_movements;
use shared::models::{order_total, plan_movements, OrderKind, OrderLine, OrderLineInput,
    VariantSnapshot};
use shared::validation::{validate_order_lines, FieldErrors};

/// Purchase order service
#[derive(Clone)]
pub struct PurchaseOrderService {
    db: PgPool,
    orders: OrdersConfig,
}

/// Input for creating a purchase order
#[derive(Debug, Deserialize)]
pub struct CreatePurchaseOrderInput {
    pub vendor_id: Uuid,
    pub products: Vec<OrderLineInput>,
    pub order_date: Option<NaiveDate>,
    pub invoice_number: Option<String>,
    pub remarks: Option<String>,
}

/// Input for amending a purchase order
#[derive(Debug, Deserialize)]
pub struct UpdatePurchaseOrderInput {
    pub vendor_id: Option<Uuid>,
    pub products: Option<Vec<OrderLineInput>>,
    pub order_date: Option<NaiveDate>,
    pub invoice_number: Option<String>,
    pub remarks: Option<String>,
}

/// A resolved counterparty reference
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CounterpartyRef {
    pub id: Uuid,
    pub name: String,
}

/// Purchase order with references resolved for presentation
#[derive(Debug, Serialize)]
pub struct PurchaseOrderView {
    pub id: Uuid,
    pub vendor: CounterpartyRef,
    pub products: Vec<OrderLineView>,
    pub total: Decimal,
    pub order_date: NaiveDate,
    pub invoice_number: Option<String>,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A line item with product and warehouse references resolved
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderLineView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub sku: String,
    pub quantity: i64,
    pub item_price: Decimal,
    pub total_price: Decimal,
    pub variant_name: String,
    pub variant_quantity: i64,
    pub warehouse_id: Option<Uuid>,
    pub warehouse_name: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    vendor_id: Uuid,
    total: Decimal,
    order_date: NaiveDate,
    invoice_number: Option<String>,
    remarks: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct OrderItemRow {
    id: Uuid,
    product_id: Uuid,
    quantity: i64,
    item_price: Decimal,
    total_price: Decimal,
    variant_name: String,
    variant_quantity: i64,
    warehouse_id: Option<Uuid>,
}

impl OrderItemRow {
    fn into_line(self) -> OrderLine {
        OrderLine {
            id: self.id,
            product_id: self.product_id,
            quantity: self.quantity,
            item_price: self.item_price,
            total_price: self.total_price,
            variant: VariantSnapshot {
                name: self.variant_name,
                quantity: self.variant_quantity,
            },
            warehouse_id: self.warehouse_id,
            original_item_price: None,
        }
    }
}

impl PurchaseOrderService {
    /// Create a new PurchaseOrderService instance
    pub fn new(db: PgPool, orders: OrdersConfig) -> Self {
        Self { db, orders }
    }

    /// Create a purchase order and apply its stock effect in one transaction
    pub async fn create_order(
        &self,
        input: CreatePurchaseOrderInput,
    ) -> AppResult<PurchaseOrderView> {
        let mut errors = FieldErrors::new();
        validate_order_lines(&input.products, &mut errors);
        if !errors.is_empty() {
            return Err(errors.into());
        }

        // Counterparty and product lookups have no ordering dependency
        let (_vendor, ()) = tokio::try_join!(
            self.fetch_vendor(input.vendor_id),
            self.ensure_products_exist(&input.products),
        )?;
        self.ensure_warehouses_exist(&input.products).await?;

        let lines: Vec<OrderLine> = input
            .products
            .iter()
            .map(|line| OrderLine::compute(line, None))
            .collect();
        let total = order_total(&lines);
        let order_date = input
            .order_date
            .unwrap_or_else(|| Utc::now().date_naive());

        let mut tx = self.db.begin().await?;

        let order_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO purchase_orders (vendor_id, total, order_date, invoice_number, remarks)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(input.vendor_id)
        .bind(total)
        .bind(order_date)
        .bind(&input.invoice_number)
        .bind(&input.remarks)
        .fetch_one(&mut *tx)
        .await?;

        insert_items(&mut tx, order_id, &lines).await?;

        // Stock arrives on purchase
        let movements = plan_movements(OrderKind::Purchase.stock_direction(), &lines);
        apply_movements(&mut tx, &movements).await?;

        tx.commit().await?;

        tracing::info!(order_id = %order_id, total = %total, "Purchase order created");

        self.get_order(order_id).await
    }

    /// Amend a purchase order. The pre-update stock effect is reversed and
    /// the post-update effect applied inside the same transaction as the
    /// persistence update, so stock never reflects a half-applied edit.
    pub async fn update_order(
        &self,
        order_id: Uuid,
        input: UpdatePurchaseOrderInput,
    ) -> AppResult<PurchaseOrderView> {
        let existing = self.fetch_order_row(order_id).await?;
        let old_lines = self.fetch_lines(order_id).await?;

        if let Some(products) = &input.products {
            let mut errors = FieldErrors::new();
            validate_order_lines(products, &mut errors);
            if !errors.is_empty() {
                return Err(errors.into());
            }
            self.ensure_products_exist(products).await?;
            self.ensure_warehouses_exist(products).await?;
        }
        if let Some(vendor_id) = input.vendor_id {
            self.fetch_vendor(vendor_id).await?;
        }

        let new_lines: Vec<OrderLine> = match &input.products {
            Some(products) => products
                .iter()
                .map(|line| OrderLine::compute(line, None))
                .collect(),
            None => old_lines.clone(),
        };
        let total = order_total(&new_lines);

        let mut tx = self.db.begin().await?;

        sqlx::query(
            r#"
            UPDATE purchase_orders
            SET vendor_id = $2, total = $3, order_date = $4, invoice_number = $5,
                remarks = $6, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(order_id)
        .bind(input.vendor_id.unwrap_or(existing.vendor_id))
        .bind(total)
        .bind(input.order_date.unwrap_or(existing.order_date))
        .bind(input.invoice_number.or(existing.invoice_number))
        .bind(input.remarks.or(existing.remarks))
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM purchase_order_items WHERE order_id = $1")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;
        insert_items(&mut tx, order_id, &new_lines).await?;

        // Two-phase reconciliation: undo the old effect, apply the new one
        let direction = OrderKind::Purchase.stock_direction();
        apply_movements(&mut tx, &plan_movements(direction.opposite(), &old_lines)).await?;
        apply_movements(&mut tx, &plan_movements(direction, &new_lines)).await?;

        tx.commit().await?;

        tracing::info!(order_id = %order_id, total = %total, "Purchase order updated");

        self.get_order(order_id).await
    }

    /// Delete a purchase order. Stock reversal on delete is a configuration
    /// choice; the legacy behavior (no reversal) is the default.
    pub async fn delete_order(&self, order_id: Uuid) -> AppResult<()> {
        self.fetch_order_row(order_id).await?;
        let lines = self.fetch_lines(order_id).await?;

        let mut tx = self.db.begin().await?;

        if self.orders.delete_reverses_stock {
            let direction = OrderKind::Purchase.stock_direction();
            apply_movements(&mut tx, &plan_movements(direction.opposite(), &lines)).await?;
        }

        sqlx::query("DELETE FROM purchase_order_items WHERE order_id = $1")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM purchase_orders WHERE id = $1")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Get a purchase order with its references resolved
    pub async fn get_order(&self, order_id: Uuid) -> AppResult<PurchaseOrderView> {
        let row = self.fetch_order_row(order_id).await?;
        let vendor = self.fetch_vendor(row.vendor_id).await?;
        let products = self.fetch_line_views(order_id).await?;

        Ok(PurchaseOrderView {
            id: row.id,
            vendor,
            products,
            total: row.total,
            order_date: row.order_date,
            invoice_number: row.invoice_number,
            remarks: row.remarks,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    /// List purchase orders, newest first, with references resolved
    pub async fn list_orders(&self) -> AppResult<Vec<PurchaseOrderView>> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, vendor_id, total, order_date, invoice_number, remarks,
                   created_at, updated_at
            FROM purchase_orders
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let vendor = self.fetch_vendor(row.vendor_id).await?;
            let products = self.fetch_line_views(row.id).await?;
            orders.push(PurchaseOrderView {
                id: row.id,
                vendor,
                products,
                total: row.total,
                order_date: row.order_date,
                invoice_number: row.invoice_number,
                remarks: row.remarks,
                created_at: row.created_at,
                updated_at: row.updated_at,
            });
        }

        Ok(orders)
    }

    async fn fetch_order_row(&self, order_id: Uuid) -> AppResult<OrderRow> {
        sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, vendor_id, total, order_date, invoice_number, remarks,
                   created_at, updated_at
            FROM purchase_orders
            WHERE id = $1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase order".to_string()))
    }

    /// The order's current lines in line order
    async fn fetch_lines(&self, order_id: Uuid) -> AppResult<Vec<OrderLine>> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            r#"
            SELECT id, product_id, quantity, item_price, total_price,
                   variant_name, variant_quantity, warehouse_id
            FROM purchase_order_items
            WHERE order_id = $1
            ORDER BY line_no
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(OrderItemRow::into_line).collect())
    }

    async fn fetch_line_views(&self, order_id: Uuid) -> AppResult<Vec<OrderLineView>> {
        let views = sqlx::query_as::<_, OrderLineView>(
            r#"
            SELECT i.id, i.product_id, p.name AS product_name, p.sku, i.quantity,
                   i.item_price, i.total_price, i.variant_name, i.variant_quantity,
                   i.warehouse_id, w.name AS warehouse_name
            FROM purchase_order_items i
            JOIN products p ON p.id = i.product_id
            LEFT JOIN warehouses w ON w.id = i.warehouse_id
            WHERE i.order_id = $1
            ORDER BY i.line_no
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.db)
        .await?;

        Ok(views)
    }

    async fn fetch_vendor(&self, vendor_id: Uuid) -> AppResult<CounterpartyRef> {
        sqlx::query_as::<_, CounterpartyRef>("SELECT id, name FROM vendors WHERE id = $1")
            .bind(vendor_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Vendor".to_string()))
    }

    /// Every referenced product must exist and be live
    async fn ensure_products_exist(&self, lines: &[OrderLineInput]) -> AppResult<()> {
        let ids: Vec<Uuid> = lines.iter().map(|line| line.product_id).collect();
        let found = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM products WHERE id = ANY($1) AND archived = FALSE",
        )
        .bind(&ids)
        .fetch_all(&self.db)
        .await?;

        for line in lines {
            if !found.contains(&line.product_id) {
                return Err(AppError::NotFound("Product".to_string()));
            }
        }

        Ok(())
    }

    /// Every referenced warehouse must exist
    async fn ensure_warehouses_exist(&self, lines: &[OrderLineInput]) -> AppResult<()> {
        let mut ids: Vec<Uuid> = lines.iter().filter_map(|line| line.warehouse_id).collect();
        ids.sort();
        ids.dedup();
        if ids.is_empty() {
            return Ok(());
        }

        let found = sqlx::query_scalar::<_, Uuid>("SELECT id FROM warehouses WHERE id = ANY($1)")
            .bind(&ids)
            .fetch_all(&self.db)
            .await?;

        for id in &ids {
            if !found.contains(id) {
                return Err(AppError::NotFound("Warehouse".to_string()));
            }
        }

        Ok(())
    }
}

/// Insert an order's line items, preserving line order
async fn insert_items(
    tx: &mut Transaction<'_, Postgres>,
    order_id: Uuid,
    lines: &[OrderLine],
) -> AppResult<()> {
    for (line_no, line) in lines.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO purchase_order_items
                (id, order_id, line_no, product_id, quantity, item_price, total_price,
                 variant_name, variant_quantity, warehouse_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(line.id)
        .bind(order_id)
        .bind(line_no as i32)
        .bind(line.product_id)
        .bind(line.quantity)
        .bind(line.item_price)
        .bind(line.total_price)
        .bind(&line.variant.name)
        .bind(line.variant.quantity)
        .bind(line.warehouse_id)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}
