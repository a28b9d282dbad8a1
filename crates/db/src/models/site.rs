//! Site entity models and DTOs.

use rota_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `sites` table. The fixed geographic point is stored as a
/// longitude/latitude pair in degrees.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Site {
    pub id: DbId,
    pub name: String,
    pub address: Option<String>,
    pub longitude: f64,
    pub latitude: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a site.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSite {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub address: Option<String>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
}

/// DTO for updating a site.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSite {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub address: Option<String>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
}
