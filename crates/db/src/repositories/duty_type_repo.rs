//! Repository for the `duty_types` catalogue.

use rota_core::types::DbId;
use sqlx::PgPool;

use crate::models::duty_type::{CreateDutyType, DutyType, UpdateDutyType};

/// Column list for `duty_types` queries.
const COLUMNS: &str = "id, code, name, icon, message_template_id, created_at, updated_at";

/// Provides CRUD operations for duty types.
pub struct DutyTypeRepo;

impl DutyTypeRepo {
    /// Create a duty type; `uq_duty_types_code` rejects duplicate codes.
    pub async fn create(pool: &PgPool, input: &CreateDutyType) -> Result<DutyType, sqlx::Error> {
        sqlx::query_as::<_, DutyType>(&format!(
            "INSERT INTO duty_types (code, name, icon, message_template_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        ))
        .bind(&input.code)
        .bind(&input.name)
        .bind(&input.icon)
        .bind(input.message_template_id)
        .fetch_one(pool)
        .await
    }

    pub async fn get(pool: &PgPool, id: DbId) -> Result<Option<DutyType>, sqlx::Error> {
        sqlx::query_as::<_, DutyType>(&format!("SELECT {COLUMNS} FROM duty_types WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch by the stable code that assignments reference.
    pub async fn find_by_code(pool: &PgPool, code: &str) -> Result<Option<DutyType>, sqlx::Error> {
        sqlx::query_as::<_, DutyType>(&format!("SELECT {COLUMNS} FROM duty_types WHERE code = $1"))
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<DutyType>, sqlx::Error> {
        sqlx::query_as::<_, DutyType>(&format!(
            "SELECT {COLUMNS} FROM duty_types ORDER BY name ASC"
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDutyType,
    ) -> Result<Option<DutyType>, sqlx::Error> {
        sqlx::query_as::<_, DutyType>(&format!(
            "UPDATE duty_types SET \
                 name = COALESCE($2, name), \
                 icon = COALESCE($3, icon), \
                 message_template_id = COALESCE($4, message_template_id), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&input.name)
        .bind(&input.icon)
        .bind(input.message_template_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM duty_types WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
