//! Message template entity models and DTOs.

use rota_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `message_templates` table. `content` carries the
/// `{placeholder}` vocabulary rendered by `rota_core::template`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MessageTemplate {
    pub id: DbId,
    pub name: String,
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a message template.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMessageTemplate {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1))]
    pub content: String,
}

/// DTO for updating a message template.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMessageTemplate {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub content: Option<String>,
}
