//! Receivable tracking service
//!
//! Money owed to the business, optionally tied to a customer.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::validation::FieldErrors;

/// Receivable service
#[derive(Clone)]
pub struct ReceivableService {
    db: PgPool,
}

/// Receivable record
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Receivable {
    pub id: Uuid,
    pub customer_id: Option<Uuid>,
    pub description: String,
    pub amount: Decimal,
    pub due_date: Option<NaiveDate>,
    pub settled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for recording a receivable
#[derive(Debug, Deserialize)]
pub struct CreateReceivableInput {
    pub customer_id: Option<Uuid>,
    pub description: String,
    pub amount: Decimal,
    pub due_date: Option<NaiveDate>,
}

/// Input for updating a receivable
#[derive(Debug, Deserialize)]
pub struct UpdateReceivableInput {
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub due_date: Option<NaiveDate>,
    pub settled: Option<bool>,
}

const RECEIVABLE_COLUMNS: &str =
    "id, customer_id, description, amount, due_date, settled, created_at, updated_at";

impl ReceivableService {
    /// Create a new ReceivableService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a receivable
    pub async fn create_receivable(&self, input: CreateReceivableInput) -> AppResult<Receivable> {
        let mut errors = FieldErrors::new();
        errors.require_text("description", &input.description);
        errors.require_non_negative_price("amount", input.amount);
        if !errors.is_empty() {
            return Err(errors.into());
        }

        if let Some(customer_id) = input.customer_id {
            let exists =
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM customers WHERE id = $1")
                    .bind(customer_id)
                    .fetch_one(&self.db)
                    .await?;
            if exists == 0 {
                return Err(AppError::NotFound("Customer".to_string()));
            }
        }

        let receivable = sqlx::query_as::<_, Receivable>(&format!(
            r#"
            INSERT INTO receivables (customer_id, description, amount, due_date)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            RECEIVABLE_COLUMNS
        ))
        .bind(input.customer_id)
        .bind(&input.description)
        .bind(input.amount)
        .bind(input.due_date)
        .fetch_one(&self.db)
        .await?;

        Ok(receivable)
    }

    /// Get a receivable
    pub async fn get_receivable(&self, receivable_id: Uuid) -> AppResult<Receivable> {
        sqlx::query_as::<_, Receivable>(&format!(
            "SELECT {} FROM receivables WHERE id = $1",
            RECEIVABLE_COLUMNS
        ))
        .bind(receivable_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Receivable".to_string()))
    }

    /// List receivables, unsettled and soonest-due first
    pub async fn list_receivables(&self) -> AppResult<Vec<Receivable>> {
        let receivables = sqlx::query_as::<_, Receivable>(&format!(
            "SELECT {} FROM receivables ORDER BY settled, due_date NULLS LAST, created_at",
            RECEIVABLE_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(receivables)
    }

    /// Update a receivable, including marking it settled
    pub async fn update_receivable(
        &self,
        receivable_id: Uuid,
        input: UpdateReceivableInput,
    ) -> AppResult<Receivable> {
        let existing = self.get_receivable(receivable_id).await?;

        let description = input.description.unwrap_or(existing.description);
        let amount = input.amount.unwrap_or(existing.amount);

        let mut errors = FieldErrors::new();
        errors.require_text("description", &description);
        errors.require_non_negative_price("amount", amount);
        if !errors.is_empty() {
            return Err(errors.into());
        }

        let receivable = sqlx::query_as::<_, Receivable>(&format!(
            r#"
            UPDATE receivables
            SET description = $2, amount = $3, due_date = $4, settled = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            RECEIVABLE_COLUMNS
        ))
        .bind(receivable_id)
        .bind(&description)
        .bind(amount)
        .bind(input.due_date.or(existing.due_date))
        .bind(input.settled.unwrap_or(existing.settled))
        .fetch_one(&self.db)
        .await?;

        Ok(receivable)
    }

    /// Delete a receivable
    pub async fn delete_receivable(&self, receivable_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM receivables WHERE id = $1")
            .bind(receivable_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Receivable".to_string()));
        }

        Ok(())
    }
}
