//! Expense tracking service

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::validation::FieldErrors;

/// Expense service
#[derive(Clone)]
pub struct ExpenseService {
    db: PgPool,
}

/// Expense record
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Expense {
    pub id: Uuid,
    pub description: String,
    pub amount: Decimal,
    pub expense_date: NaiveDate,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for recording an expense
#[derive(Debug, Deserialize)]
pub struct CreateExpenseInput {
    pub description: String,
    pub amount: Decimal,
    pub expense_date: Option<NaiveDate>,
    pub remarks: Option<String>,
}

/// Input for updating an expense
#[derive(Debug, Deserialize)]
pub struct UpdateExpenseInput {
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub expense_date: Option<NaiveDate>,
    pub remarks: Option<String>,
}

const EXPENSE_COLUMNS: &str =
    "id, description, amount, expense_date, remarks, created_at, updated_at";

impl ExpenseService {
    /// Create a new ExpenseService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record an expense
    pub async fn create_expense(&self, input: CreateExpenseInput) -> AppResult<Expense> {
        let mut errors = FieldErrors::new();
        errors.require_text("description", &input.description);
        errors.require_non_negative_price("amount", input.amount);
        if !errors.is_empty() {
            return Err(errors.into());
        }

        let expense_date = input
            .expense_date
            .unwrap_or_else(|| Utc::now().date_naive());

        let expense = sqlx::query_as::<_, Expense>(&format!(
            r#"
            INSERT INTO expenses (description, amount, expense_date, remarks)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            EXPENSE_COLUMNS
        ))
        .bind(&input.description)
        .bind(input.amount)
        .bind(expense_date)
        .bind(&input.remarks)
        .fetch_one(&self.db)
        .await?;

        Ok(expense)
    }

    /// Get an expense
    pub async fn get_expense(&self, expense_id: Uuid) -> AppResult<Expense> {
        sqlx::query_as::<_, Expense>(&format!(
            "SELECT {} FROM expenses WHERE id = $1",
            EXPENSE_COLUMNS
        ))
        .bind(expense_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Expense".to_string()))
    }

    /// List expenses, newest first
    pub async fn list_expenses(&self) -> AppResult<Vec<Expense>> {
        let expenses = sqlx::query_as::<_, Expense>(&format!(
            "SELECT {} FROM expenses ORDER BY expense_date DESC, created_at DESC",
            EXPENSE_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(expenses)
    }

    /// Update an expense
    pub async fn update_expense(
        &self,
        expense_id: Uuid,
        input: UpdateExpenseInput,
    ) -> AppResult<Expense> {
        let existing = self.get_expense(expense_id).await?;

        let description = input.description.unwrap_or(existing.description);
        let amount = input.amount.unwrap_or(existing.amount);

        let mut errors = FieldErrors::new();
        errors.require_text("description", &description);
        errors.require_non_negative_price("amount", amount);
        if !errors.is_empty() {
            return Err(errors.into());
        }

        let expense = sqlx::query_as::<_, Expense>(&format!(
            r#"
            UPDATE expenses
            SET description = $2, amount = $3, expense_date = $4, remarks = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            EXPENSE_COLUMNS
        ))
        .bind(expense_id)
        .bind(&description)
        .bind(amount)
        .bind(input.expense_date.unwrap_or(existing.expense_date))
        .bind(input.remarks.or(existing.remarks))
        .fetch_one(&self.db)
        .await?;

        Ok(expense)
    }

    /// Delete an expense
    pub async fn delete_expense(&self, expense_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1")
            .bind(expense_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Expense".to_string()));
        }

        Ok(())
    }
}
