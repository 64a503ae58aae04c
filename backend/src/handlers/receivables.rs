//! HTTP handlers for receivable endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::receivable::{
    CreateReceivableInput, Receivable, ReceivableService, UpdateReceivableInput,
};
use crate::AppState;

/// Record a receivable
pub async fn create_receivable(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateReceivableInput>,
) -> AppResult<Json<Receivable>> {
    current_user.0.require_admin()?;
    let service = ReceivableService::new(state.db);
    let receivable = service.create_receivable(input).await?;
    Ok(Json(receivable))
}

/// List receivables
pub async fn list_receivables(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<Receivable>>> {
    let service = ReceivableService::new(state.db);
    let receivables = service.list_receivables().await?;
    Ok(Json(receivables))
}

/// Get a receivable
pub async fn get_receivable(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(receivable_id): Path<Uuid>,
) -> AppResult<Json<Receivable>> {
    let service = ReceivableService::new(state.db);
    let receivable = service.get_receivable(receivable_id).await?;
    Ok(Json(receivable))
}

/// Update a receivable, including settling it
pub async fn update_receivable(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(receivable_id): Path<Uuid>,
    Json(input): Json<UpdateReceivableInput>,
) -> AppResult<Json<Receivable>> {
    current_user.0.require_admin()?;
    let service = ReceivableService::new(state.db);
    let receivable = service.update_receivable(receivable_id, input).await?;
    Ok(Json(receivable))
}

/// Delete a receivable
pub async fn delete_receivable(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(receivable_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    current_user.0.require_admin()?;
    let service = ReceivableService::new(state.db);
    service.delete_receivable(receivable_id).await?;
    Ok(Json(()))
}
