//! HTTP handlers for sales order endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::sales_order::{
    CreateSalesOrderInput, SalesOrderService, SalesOrderView, UpdateSalesOrderInput,
};
use crate::AppState;

fn service(state: AppState) -> SalesOrderService {
    SalesOrderService::new(state.db, state.config.orders.clone())
}

/// Create a sales order (stock leaves on commit)
pub async fn create_sales_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateSalesOrderInput>,
) -> AppResult<Json<SalesOrderView>> {
    current_user.0.require_admin()?;
    let order = service(state).create_order(input).await?;
    Ok(Json(order))
}

/// List sales orders
pub async fn list_sales_orders(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<SalesOrderView>>> {
    let orders = service(state).list_orders().await?;
    Ok(Json(orders))
}

/// Get a sales order
pub async fn get_sales_order(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<SalesOrderView>> {
    let order = service(state).get_order(order_id).await?;
    Ok(Json(order))
}

/// Amend a sales order
pub async fn update_sales_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
    Json(input): Json<UpdateSalesOrderInput>,
) -> AppResult<Json<SalesOrderView>> {
    current_user.0.require_admin()?;
    let order = service(state).update_order(order_id, input).await?;
    Ok(Json(order))
}

/// Delete a sales order
pub async fn delete_sales_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    current_user.0.require_admin()?;
    service(state).delete_order(order_id).await?;
    Ok(Json(()))
}
