//! Error handling for the Inventory & Order Management Platform
//!
//! Provides consistent error responses in Thai and English

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use shared::models::TransferError;
use shared::validation::{FieldError, FieldErrors};

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_th: String,
    },

    /// Every offending field of an input, reported at once
    #[error("Validation failed")]
    ValidationFailed(Vec<FieldError>),

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Conflict: {message}")]
    Conflict {
        resource: String,
        message: String,
        message_th: String,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Business logic errors
    #[error("Invalid transfer: {message}")]
    InvalidTransfer {
        message: String,
        message_th: String,
    },

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        AppError::ValidationFailed(errors.into_errors())
    }
}

impl From<TransferError> for AppError {
    fn from(err: TransferError) -> Self {
        AppError::InvalidTransfer {
            message: err.message().to_string(),
            message_th: err.message_th().to_string(),
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_th: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldError>>,
}

impl ErrorDetail {
    fn simple(code: &str, message_en: String, message_th: String) -> Self {
        Self {
            code: code.to_string(),
            message_en,
            message_th,
            field: None,
            fields: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail::simple(
                    "INVALID_CREDENTIALS",
                    "Invalid email or password".to_string(),
                    "อีเมลหรือรหัสผ่านไม่ถูกต้อง".to_string(),
                ),
            ),
            AppError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail::simple(
                    "TOKEN_EXPIRED",
                    "Token has expired".to_string(),
                    "โทเค็นหมดอายุแล้ว".to_string(),
                ),
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail::simple(
                    "INVALID_TOKEN",
                    "Invalid token".to_string(),
                    "โทเค็นไม่ถูกต้อง".to_string(),
                ),
            ),
            AppError::InsufficientPermissions => (
                StatusCode::FORBIDDEN,
                ErrorDetail::simple(
                    "INSUFFICIENT_PERMISSIONS",
                    "You do not have permission to perform this action".to_string(),
                    "คุณไม่มีสิทธิ์ในการดำเนินการนี้".to_string(),
                ),
            ),
            AppError::Validation {
                field,
                message,
                message_th,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: message.clone(),
                    message_th: message_th.clone(),
                    field: Some(field.clone()),
                    fields: None,
                },
            ),
            AppError::ValidationFailed(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: "Validation failed".to_string(),
                    message_th: "ข้อมูลไม่ถูกต้อง".to_string(),
                    field: None,
                    fields: Some(errors.clone()),
                },
            ),
            AppError::DuplicateEntry(field) => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "DUPLICATE_ENTRY".to_string(),
                    message_en: format!("A record with this {} already exists", field),
                    message_th: format!("มีข้อมูล {} นี้อยู่แล้ว", field),
                    field: Some(field.clone()),
                    fields: None,
                },
            ),
            AppError::Conflict {
                resource,
                message,
                message_th,
            } => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "CONFLICT".to_string(),
                    message_en: message.clone(),
                    message_th: message_th.clone(),
                    field: Some(resource.clone()),
                    fields: None,
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail::simple(
                    "NOT_FOUND",
                    format!("{} not found", resource),
                    format!("ไม่พบ {}", resource),
                ),
            ),
            AppError::InvalidTransfer {
                message,
                message_th,
            } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail::simple("INVALID_TRANSFER", message.clone(), message_th.clone()),
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::simple(
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                    "เกิดข้อผิดพลาดกับฐานข้อมูล".to_string(),
                ),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::simple(
                    "INTERNAL_ERROR",
                    msg.clone(),
                    "เกิดข้อผิดพลาดภายในเซิร์ฟเวอร์".to_string(),
                ),
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::simple(
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    "เกิดข้อผิดพลาดภายในเซิร์ฟเวอร์".to_string(),
                ),
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
