//! HTTP handlers for variant endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::variant::{CreateVariantInput, Variant, VariantService};
use crate::AppState;

/// Create a variant for a product
pub async fn create_variant(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateVariantInput>,
) -> AppResult<Json<Variant>> {
    current_user.0.require_admin()?;
    let service = VariantService::new(state.db);
    let variant = service.create_variant(input).await?;
    Ok(Json(variant))
}

/// List a product's variants
pub async fn get_product_variants(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Vec<Variant>>> {
    let service = VariantService::new(state.db);
    let variants = service.get_variants(product_id).await?;
    Ok(Json(variants))
}

/// Delete a variant
pub async fn delete_variant(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(variant_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    current_user.0.require_admin()?;
    let service = VariantService::new(state.db);
    service.delete_variant(variant_id).await?;
    Ok(Json(()))
}
