//! Vendor management service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Vendor service
#[derive(Clone)]
pub struct VendorService {
    db: PgPool,
}

/// Vendor record
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Vendor {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a vendor
#[derive(Debug, Deserialize)]
pub struct CreateVendorInput {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Input for updating a vendor
#[derive(Debug, Deserialize)]
pub struct UpdateVendorInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

const VENDOR_COLUMNS: &str = "id, name, email, phone, address, created_at, updated_at";

impl VendorService {
    /// Create a new VendorService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a vendor
    pub async fn create_vendor(&self, input: CreateVendorInput) -> AppResult<Vendor> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "name is required".to_string(),
                message_th: "ต้องระบุ name".to_string(),
            });
        }

        let vendor = sqlx::query_as::<_, Vendor>(&format!(
            r#"
            INSERT INTO vendors (name, email, phone, address)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            VENDOR_COLUMNS
        ))
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .fetch_one(&self.db)
        .await?;

        Ok(vendor)
    }

    /// Get a vendor
    pub async fn get_vendor(&self, vendor_id: Uuid) -> AppResult<Vendor> {
        sqlx::query_as::<_, Vendor>(&format!(
            "SELECT {} FROM vendors WHERE id = $1",
            VENDOR_COLUMNS
        ))
        .bind(vendor_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Vendor".to_string()))
    }

    /// List all vendors
    pub async fn list_vendors(&self) -> AppResult<Vec<Vendor>> {
        let vendors = sqlx::query_as::<_, Vendor>(&format!(
            "SELECT {} FROM vendors ORDER BY name",
            VENDOR_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(vendors)
    }

    /// Update a vendor
    pub async fn update_vendor(
        &self,
        vendor_id: Uuid,
        input: UpdateVendorInput,
    ) -> AppResult<Vendor> {
        let existing = self.get_vendor(vendor_id).await?;

        let name = input.name.unwrap_or(existing.name);
        if name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "name is required".to_string(),
                message_th: "ต้องระบุ name".to_string(),
            });
        }

        let vendor = sqlx::query_as::<_, Vendor>(&format!(
            r#"
            UPDATE vendors
            SET name = $2, email = $3, phone = $4, address = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            VENDOR_COLUMNS
        ))
        .bind(vendor_id)
        .bind(&name)
        .bind(input.email.or(existing.email))
        .bind(input.phone.or(existing.phone))
        .bind(input.address.or(existing.address))
        .fetch_one(&self.db)
        .await?;

        Ok(vendor)
    }

    /// Delete a vendor. Vendors referenced by purchase orders stay.
    pub async fn delete_vendor(&self, vendor_id: Uuid) -> AppResult<()> {
        let referenced = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM purchase_orders WHERE vendor_id = $1",
        )
        .bind(vendor_id)
        .fetch_one(&self.db)
        .await?;

        if referenced > 0 {
            return Err(AppError::Conflict {
                resource: "vendor".to_string(),
                message: "Vendor has purchase orders and cannot be deleted".to_string(),
                message_th: "ผู้ขายมีใบสั่งซื้ออยู่ ไม่สามารถลบได้".to_string(),
            });
        }

        let result = sqlx::query("DELETE FROM vendors WHERE id = $1")
            .bind(vendor_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Vendor".to_string()));
        }

        Ok(())
    }
}
