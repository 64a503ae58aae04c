//! HTTP handlers for expense endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::expense::{CreateExpenseInput, Expense, ExpenseService, UpdateExpenseInput};
use crate::AppState;

/// Record an expense
pub async fn create_expense(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateExpenseInput>,
) -> AppResult<Json<Expense>> {
    current_user.0.require_admin()?;
    let service = ExpenseService::new(state.db);
    let expense = service.create_expense(input).await?;
    Ok(Json(expense))
}

/// List expenses
pub async fn list_expenses(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<Expense>>> {
    let service = ExpenseService::new(state.db);
    let expenses = service.list_expenses().await?;
    Ok(Json(expenses))
}

/// Get an expense
pub async fn get_expense(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(expense_id): Path<Uuid>,
) -> AppResult<Json<Expense>> {
    let service = ExpenseService::new(state.db);
    let expense = service.get_expense(expense_id).await?;
    Ok(Json(expense))
}

/// Update an expense
pub async fn update_expense(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(expense_id): Path<Uuid>,
    Json(input): Json<UpdateExpenseInput>,
) -> AppResult<Json<Expense>> {
    current_user.0.require_admin()?;
    let service = ExpenseService::new(state.db);
    let expense = service.update_expense(expense_id, input).await?;
    Ok(Json(expense))
}

/// Delete an expense
pub async fn delete_expense(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(expense_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    current_user.0.require_admin()?;
    let service = ExpenseService::new(state.db);
    service.delete_expense(expense_id).await?;
    Ok(Json(()))
}
