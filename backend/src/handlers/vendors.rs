//! HTTP handlers for vendor endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::vendor::{CreateVendorInput, UpdateVendorInput, Vendor, VendorService};
use crate::AppState;

/// Create a vendor
pub async fn create_vendor(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateVendorInput>,
) -> AppResult<Json<Vendor>> {
    current_user.0.require_admin()?;
    let service = VendorService::new(state.db);
    let vendor = service.create_vendor(input).await?;
    Ok(Json(vendor))
}

/// List vendors
pub async fn list_vendors(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<Vendor>>> {
    let service = VendorService::new(state.db);
    let vendors = service.list_vendors().await?;
    Ok(Json(vendors))
}

/// Get a vendor
pub async fn get_vendor(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(vendor_id): Path<Uuid>,
) -> AppResult<Json<Vendor>> {
    let service = VendorService::new(state.db);
    let vendor = service.get_vendor(vendor_id).await?;
    Ok(Json(vendor))
}

/// Update a vendor
pub async fn update_vendor(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(vendor_id): Path<Uuid>,
    Json(input): Json<UpdateVendorInput>,
) -> AppResult<Json<Vendor>> {
    current_user.0.require_admin()?;
    let service = VendorService::new(state.db);
    let vendor = service.update_vendor(vendor_id, input).await?;
    Ok(Json(vendor))
}

/// Delete a vendor
pub async fn delete_vendor(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(vendor_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    current_user.0.require_admin()?;
    let service = VendorService::new(state.db);
    service.delete_vendor(vendor_id).await?;
    Ok(Json(()))
}
