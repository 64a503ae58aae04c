//! HTTP handlers for authentication endpoints

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::auth::{AuthResponse, AuthService, LoginInput, RegisterInput};
use crate::AppState;
use shared::models::User;

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> AppResult<Json<AuthResponse>> {
    let service = AuthService::new(state.db.clone(), &state.config);
    let response = service.register(input).await?;
    Ok(Json(response))
}

/// Log in with email and password
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> AppResult<Json<AuthResponse>> {
    let service = AuthService::new(state.db.clone(), &state.config);
    let response = service.login(input).await?;
    Ok(Json(response))
}

/// The authenticated user's profile
pub async fn me(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<User>> {
    let service = AuthService::new(state.db.clone(), &state.config);
    let user = service.get_user(current_user.0.user_id).await?;
    Ok(Json(user))
}
