//! HTTP handlers for purchase order endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::purchase_order::{
    CreatePurchaseOrderInput, PurchaseOrderService, PurchaseOrderView, UpdatePurchaseOrderInput,
};
use crate::AppState;

fn service(state: AppState) -> PurchaseOrderService {
    PurchaseOrderService::new(state.db, state.config.orders.clone())
}

/// Create a purchase order (stock arrives on commit)
pub async fn create_purchase_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreatePurchaseOrderInput>,
) -> AppResult<Json<PurchaseOrderView>> {
    current_user.0.require_admin()?;
    let order = service(state).create_order(input).await?;
    Ok(Json(order))
}

/// List purchase orders
pub async fn list_purchase_orders(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<PurchaseOrderView>>> {
    let orders = service(state).list_orders().await?;
    Ok(Json(orders))
}

/// Get a purchase order
pub async fn get_purchase_order(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<PurchaseOrderView>> {
    let order = service(state).get_order(order_id).await?;
    Ok(Json(order))
}

/// Amend a purchase order
pub async fn update_purchase_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
    Json(input): Json<UpdatePurchaseOrderInput>,
) -> AppResult<Json<PurchaseOrderView>> {
    current_user.0.require_admin()?;
    let order = service(state).update_order(order_id, input).await?;
    Ok(Json(order))
}

/// Delete a purchase order
pub async fn delete_purchase_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    current_user.0.require_admin()?;
    service(state).delete_order(order_id).await?;
    Ok(Json(()))
}
