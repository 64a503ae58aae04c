//! HTTP handlers for stock transfer and per-product stock views

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::stock::{ProductStockView, StockService, TransferInput};
use crate::AppState;

/// Move stock between two locations
pub async fn transfer_stock(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<TransferInput>,
) -> AppResult<Json<ProductStockView>> {
    current_user.0.require_admin()?;
    let service = StockService::new(state.db);
    let view = service.transfer(input).await?;
    Ok(Json(view))
}

/// A product with its stock at every location
pub async fn get_product_stock(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<ProductStockView>> {
    let service = StockService::new(state.db);
    let view = service.product_stock_view(product_id).await?;
    Ok(Json(view))
}
