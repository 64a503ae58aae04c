//! HTTP handlers for warehouse endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::warehouse::{
    CreateWarehouseInput, SetStockInput, UpdateWarehouseInput, Warehouse, WarehouseService,
    WarehouseWithStock,
};
use crate::AppState;
use shared::models::StockEntry;

/// Create a warehouse
pub async fn create_warehouse(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateWarehouseInput>,
) -> AppResult<Json<Warehouse>> {
    current_user.0.require_admin()?;
    let service = WarehouseService::new(state.db);
    let warehouse = service.create_warehouse(input).await?;
    Ok(Json(warehouse))
}

/// List warehouses
pub async fn list_warehouses(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<Warehouse>>> {
    let service = WarehouseService::new(state.db);
    let warehouses = service.list_warehouses().await?;
    Ok(Json(warehouses))
}

/// Get a warehouse with its stock entries
pub async fn get_warehouse(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(warehouse_id): Path<Uuid>,
) -> AppResult<Json<WarehouseWithStock>> {
    let service = WarehouseService::new(state.db);
    let warehouse = service.get_warehouse(warehouse_id).await?;
    Ok(Json(warehouse))
}

/// Rename a warehouse
pub async fn update_warehouse(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(warehouse_id): Path<Uuid>,
    Json(input): Json<UpdateWarehouseInput>,
) -> AppResult<Json<Warehouse>> {
    current_user.0.require_admin()?;
    let service = WarehouseService::new(state.db);
    let warehouse = service.update_warehouse(warehouse_id, input).await?;
    Ok(Json(warehouse))
}

/// Set a warehouse's stock for a product (absolute upsert)
pub async fn set_warehouse_stock(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(warehouse_id): Path<Uuid>,
    Json(input): Json<SetStockInput>,
) -> AppResult<Json<StockEntry>> {
    current_user.0.require_admin()?;
    let service = WarehouseService::new(state.db);
    let entry = service.set_stock(warehouse_id, input).await?;
    Ok(Json(entry))
}

/// Get a warehouse's stock entry for a product (null when absent)
pub async fn get_warehouse_stock_entry(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path((warehouse_id, product_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<Option<StockEntry>>> {
    let service = WarehouseService::new(state.db);
    let entry = service.get_stock_entry(warehouse_id, product_id).await?;
    Ok(Json(entry))
}
