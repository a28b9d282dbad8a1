//! Resident entity models and DTOs.
//!
//! Residents are the notification recipient base for a site. `resident_type`
//! distinguishes the owner-of-record from a current tenant of the same unit.

use rota_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Resident type codes.
pub const RESIDENT_TYPE_OWNER: &str = "OWNER";
pub const RESIDENT_TYPE_TENANT: &str = "TENANT";

/// A row from the `residents` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Resident {
    pub id: DbId,
    pub site_id: DbId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub unit_number: Option<String>,
    /// `OWNER` or `TENANT`.
    pub resident_type: String,
    pub phone: String,
    pub created_at: Timestamp,
}

/// DTO for creating a resident under a site.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateResident {
    #[validate(length(max = 100))]
    pub first_name: Option<String>,
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
    #[validate(length(max = 50))]
    pub unit_number: Option<String>,
    /// Defaults to `OWNER`.
    pub resident_type: Option<String>,
    #[validate(length(min = 7, max = 20))]
    pub phone: String,
}
