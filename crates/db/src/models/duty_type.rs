//! Duty-type catalogue models and DTOs.

use rota_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `duty_types` table. `code` is the stable identifier that
/// assignments reference; `name` is the display label used in notifications.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DutyType {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub icon: Option<String>,
    pub message_template_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a duty type.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDutyType {
    #[validate(length(min = 1, max = 50))]
    pub code: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 50))]
    pub icon: Option<String>,
    pub message_template_id: Option<DbId>,
}

/// DTO for updating a duty type.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDutyType {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 50))]
    pub icon: Option<String>,
    pub message_template_id: Option<DbId>,
}
