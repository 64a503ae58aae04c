//! Sales order service
//!
//! Structurally symmetric with purchasing, but stock leaves on commit and
//! each line snapshots the product's selling price the first time that
//! product appears, so later price edits never disturb margin analysis.
//! Walk-in sales carry no customer reference.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashMap;
use uuid::Uuid;

use crate::config::OrdersConfig;
use crate::error::{AppError, AppResult};
use crate::services::purchase_order::CounterpartyRef;
use crate::services::stock::apply_movements;
use shared::models::{order_total, plan_movements, OrderKind, OrderLine, OrderLineInput,
    VariantSnapshot};
use shared::validation::{validate_order_lines, FieldErrors};

/// Sales order service
#[derive(Clone)]
pub struct SalesOrderService {
    db: PgPool,
    orders: OrdersConfig,
}

/// Input for creating a sales order
#[derive(Debug, Deserialize)]
pub struct CreateSalesOrderInput {
    /// Absent for walk-in sales
    pub customer_id: Option<Uuid>,
    pub products: Vec<OrderLineInput>,
    pub order_date: Option<NaiveDate>,
    pub invoice_number: Option<String>,
    pub remarks: Option<String>,
}

/// Input for amending a sales order
#[derive(Debug, Deserialize)]
pub struct UpdateSalesOrderInput {
    pub customer_id: Option<Uuid>,
    pub products: Option<Vec<OrderLineInput>>,
    pub order_date: Option<NaiveDate>,
    pub invoice_number: Option<String>,
    pub remarks: Option<String>,
}

/// Sales order with references resolved for presentation
#[derive(Debug, Serialize)]
pub struct SalesOrderView {
    pub id: Uuid,
    pub customer: Option<CounterpartyRef>,
    pub products: Vec<SalesOrderLineView>,
    pub total: Decimal,
    pub order_date: NaiveDate,
    pub invoice_number: Option<String>,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A line item with product and warehouse references resolved
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SalesOrderLineView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub sku: String,
    pub quantity: i64,
    pub item_price: Decimal,
    pub total_price: Decimal,
    pub original_item_price: Option<Decimal>,
    pub variant_name: String,
    pub variant_quantity: i64,
    pub warehouse_id: Option<Uuid>,
    pub warehouse_name: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    customer_id: Option<Uuid>,
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
    original_item_price: Option<Decimal>,
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
            original_item_price: self.original_item_price,
        }
    }
}

impl SalesOrderService {
    /// Create a new SalesOrderService instance
    pub fn new(db: PgPool, orders: OrdersConfig) -> Self {
        Self { db, orders }
    }

    /// Create a sales order and apply its stock effect in one transaction
    pub async fn create_order(&self, input: CreateSalesOrderInput) -> AppResult<SalesOrderView> {
        let mut errors = FieldErrors::new();
        validate_order_lines(&input.products, &mut errors);
        if !errors.is_empty() {
            return Err(errors.into());
        }

        if let Some(customer_id) = input.customer_id {
            self.fetch_customer(customer_id).await?;
        }
        let selling_prices = self.fetch_selling_prices(&input.products).await?;
        self.ensure_warehouses_exist(&input.products).await?;

        // Each line snapshots the selling price at creation time
        let lines: Vec<OrderLine> = input
            .products
            .iter()
            .map(|line| {
                OrderLine::compute(line, selling_prices.get(&line.product_id).copied())
            })
            .collect();
        let total = order_total(&lines);
        let order_date = input
            .order_date
            .unwrap_or_else(|| Utc::now().date_naive());

        let mut tx = self.db.begin().await?;

        let order_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO sales_orders (customer_id, total, order_date, invoice_number, remarks)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(input.customer_id)
        .bind(total)
        .bind(order_date)
        .bind(&input.invoice_number)
        .bind(&input.remarks)
        .fetch_one(&mut *tx)
        .await?;

        insert_items(&mut tx, order_id, &lines).await?;

        // Stock leaves on sale; negative stock signals oversell
        let movements = plan_movements(OrderKind::Sales.stock_direction(), &lines);
        apply_movements(&mut tx, &movements).await?;

        tx.commit().await?;

        tracing::info!(order_id = %order_id, total = %total, "Sales order created");

        self.get_order(order_id).await
    }

    /// Amend a sales order. Lines keep the original selling-price snapshot
    /// from the pre-update state when the same product reappears; new
    /// products snapshot the current selling price. Stock reconciliation
    /// runs in two phases inside the persistence transaction.
    pub async fn update_order(
        &self,
        order_id: Uuid,
        input: UpdateSalesOrderInput,
    ) -> AppResult<SalesOrderView> {
        let existing = self.fetch_order_row(order_id).await?;
        let old_lines = self.fetch_lines(order_id).await?;

        if let Some(products) = &input.products {
            let mut errors = FieldErrors::new();
            validate_order_lines(products, &mut errors);
            if !errors.is_empty() {
                return Err(errors.into());
            }
            self.ensure_warehouses_exist(products).await?;
        }
        if let Some(customer_id) = input.customer_id {
            self.fetch_customer(customer_id).await?;
        }

        let new_lines: Vec<OrderLine> = match &input.products {
            Some(products) => {
                let selling_prices = self.fetch_selling_prices(products).await?;

                // First appearance of a product in the old lines wins
                let mut prior: HashMap<Uuid, Decimal> = HashMap::new();
                for line in &old_lines {
                    if let Some(price) = line.original_item_price {
                        prior.entry(line.product_id).or_insert(price);
                    }
                }

                products
                    .iter()
                    .map(|line| {
                        let original = prior
                            .get(&line.product_id)
                            .copied()
                            .or_else(|| selling_prices.get(&line.product_id).copied());
                        OrderLine::compute(line, original)
                    })
                    .collect()
            }
            None => old_lines.clone(),
        };
        let total = order_total(&new_lines);

        let mut tx = self.db.begin().await?;

        sqlx::query(
            r#"
            UPDATE sales_orders
            SET customer_id = $2, total = $3, order_date = $4, invoice_number = $5,
                remarks = $6, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(order_id)
        .bind(input.customer_id.or(existing.customer_id))
        .bind(total)
        .bind(input.order_date.unwrap_or(existing.order_date))
        .bind(input.invoice_number.or(existing.invoice_number))
        .bind(input.remarks.or(existing.remarks))
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM sales_order_items WHERE order_id = $1")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;
        insert_items(&mut tx, order_id, &new_lines).await?;

        // Two-phase reconciliation: undo the old effect, apply the new one
        let direction = OrderKind::Sales.stock_direction();
        apply_movements(&mut tx, &plan_movements(direction.opposite(), &old_lines)).await?;
        apply_movements(&mut tx, &plan_movements(direction, &new_lines)).await?;

        tx.commit().await?;

        tracing::info!(order_id = %order_id, total = %total, "Sales order updated");

        self.get_order(order_id).await
    }

    /// Delete a sales order. Stock reversal on delete is a configuration
    /// choice; the legacy behavior (no reversal) is the default.
    pub async fn delete_order(&self, order_id: Uuid) -> AppResult<()> {
        self.fetch_order_row(order_id).await?;
        let lines = self.fetch_lines(order_id).await?;

        let mut tx = self.db.begin().await?;

        if self.orders.delete_reverses_stock {
            let direction = OrderKind::Sales.stock_direction();
            apply_movements(&mut tx, &plan_movements(direction.opposite(), &lines)).await?;
        }

        sqlx::query("DELETE FROM sales_order_items WHERE order_id = $1")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM sales_orders WHERE id = $1")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Get a sales order with its references resolved
    pub async fn get_order(&self, order_id: Uuid) -> AppResult<SalesOrderView> {
        let row = self.fetch_order_row(order_id).await?;
        self.build_view(row).await
    }

    /// List sales orders, newest first, with references resolved
    pub async fn list_orders(&self) -> AppResult<Vec<SalesOrderView>> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, customer_id, total, order_date, invoice_number, remarks,
                   created_at, updated_at
            FROM sales_orders
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            orders.push(self.build_view(row).await?);
        }

        Ok(orders)
    }

    async fn build_view(&self, row: OrderRow) -> AppResult<SalesOrderView> {
        let customer = match row.customer_id {
            Some(customer_id) => Some(self.fetch_customer(customer_id).await?),
            None => None,
        };
        let products = self.fetch_line_views(row.id).await?;

        Ok(SalesOrderView {
            id: row.id,
            customer,
            products,
            total: row.total,
            order_date: row.order_date,
            invoice_number: row.invoice_number,
            remarks: row.remarks,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    async fn fetch_order_row(&self, order_id: Uuid) -> AppResult<OrderRow> {
        sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, customer_id, total, order_date, invoice_number, remarks,
                   created_at, updated_at
            FROM sales_orders
            WHERE id = $1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Sales order".to_string()))
    }

    /// The order's current lines in line order
    async fn fetch_lines(&self, order_id: Uuid) -> AppResult<Vec<OrderLine>> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            r#"
            SELECT id, product_id, quantity, item_price, total_price, original_item_price,
                   variant_name, variant_quantity, warehouse_id
            FROM sales_order_items
            WHERE order_id = $1
            ORDER BY line_no
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(OrderItemRow::into_line).collect())
    }

    async fn fetch_line_views(&self, order_id: Uuid) -> AppResult<Vec<SalesOrderLineView>> {
        let views = sqlx::query_as::<_, SalesOrderLineView>(
            r#"
            SELECT i.id, i.product_id, p.name AS product_name, p.sku, i.quantity,
                   i.item_price, i.total_price, i.original_item_price, i.variant_name,
                   i.variant_quantity, i.warehouse_id, w.name AS warehouse_name
            FROM sales_order_items i
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

    async fn fetch_customer(&self, customer_id: Uuid) -> AppResult<CounterpartyRef> {
        sqlx::query_as::<_, CounterpartyRef>("SELECT id, name FROM customers WHERE id = $1")
            .bind(customer_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Customer".to_string()))
    }

    /// Every referenced product must exist and be live; returns each
    /// product's current selling price for snapshotting
    async fn fetch_selling_prices(
        &self,
        lines: &[OrderLineInput],
    ) -> AppResult<HashMap<Uuid, Decimal>> {
        let ids: Vec<Uuid> = lines.iter().map(|line| line.product_id).collect();
        let rows = sqlx::query_as::<_, (Uuid, Decimal)>(
            "SELECT id, selling_price FROM products WHERE id = ANY($1) AND archived = FALSE",
        )
        .bind(&ids)
        .fetch_all(&self.db)
        .await?;

        let prices: HashMap<Uuid, Decimal> = rows.into_iter().collect();
        for line in lines {
            if !prices.contains_key(&line.product_id) {
                return Err(AppError::NotFound("Product".to_string()));
            }
        }

        Ok(prices)
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
            INSERT INTO sales_order_items
                (id, order_id, line_no, product_id, quantity, item_price, total_price,
                 original_item_price, variant_name, variant_quantity, warehouse_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(line.id)
        .bind(order_id)
        .bind(line_no as i32)
        .bind(line.product_id)
        .bind(line.quantity)
        .bind(line.item_price)
        .bind(line.total_price)
        .bind(line.original_item_price)
        .bind(&line.variant.name)
        .bind(line.variant.quantity)
        .bind(line.warehouse_id)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}
