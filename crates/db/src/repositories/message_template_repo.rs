//! Repository for the `message_templates` table.

use rota_core::types::DbId;
use sqlx::PgPool;

use crate::models::message_template::{CreateMessageTemplate, MessageTemplate, UpdateMessageTemplate};

/// Column list for `message_templates` queries.
const COLUMNS: &str = "id, name, content, created_at, updated_at";

/// Provides CRUD operations for message templates.
pub struct MessageTemplateRepo;

impl MessageTemplateRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateMessageTemplate,
    ) -> Result<MessageTemplate, sqlx::Error> {
        sqlx::query_as::<_, MessageTemplate>(&format!(
            "INSERT INTO message_templates (name, content) \
             VALUES ($1, $2) \
             RETURNING {COLUMNS}"
        ))
        .bind(&input.name)
        .bind(&input.content)
        .fetch_one(pool)
        .await
    }

    pub async fn get(pool: &PgPool, id: DbId) -> Result<Option<MessageTemplate>, sqlx::Error> {
        sqlx::query_as::<_, MessageTemplate>(&format!(
            "SELECT {COLUMNS} FROM message_templates WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<MessageTemplate>, sqlx::Error> {
        sqlx::query_as::<_, MessageTemplate>(&format!(
            "SELECT {COLUMNS} FROM message_templates ORDER BY name ASC"
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMessageTemplate,
    ) -> Result<Option<MessageTemplate>, sqlx::Error> {
        sqlx::query_as::<_, MessageTemplate>(&format!(
            "UPDATE message_templates SET \
                 name = COALESCE($2, name), \
                 content = COALESCE($3, content), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&input.name)
        .bind(&input.content)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM message_templates WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
