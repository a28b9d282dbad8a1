//! Staff entity models and DTOs.
//!
//! Credentials are owned by the external auth gateway; this service only
//! tracks the directory data it needs for scheduling and display.

use rota_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `staff` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Staff {
    pub id: DbId,
    pub name: String,
    pub phone: String,
    /// `admin` or `field`.
    pub role: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a staff member.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateStaff {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 7, max = 20))]
    pub phone: String,
    /// Defaults to `field`.
    pub role: Option<String>,
}

/// DTO for updating a staff member.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStaff {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 7, max = 20))]
    pub phone: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}
