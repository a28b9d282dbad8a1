//! Repository for the `staff` table.

use rota_core::types::DbId;
use sqlx::PgPool;

use crate::models::staff::{CreateStaff, Staff, UpdateStaff};

/// Column list for `staff` queries.
const COLUMNS: &str = "id, name, phone, role, is_active, created_at, updated_at";

/// Provides CRUD operations for staff members.
pub struct StaffRepo;

impl StaffRepo {
    /// Create a staff member. The phone number must already be normalized;
    /// `uq_staff_phone` rejects duplicates.
    pub async fn create(pool: &PgPool, input: &CreateStaff) -> Result<Staff, sqlx::Error> {
        sqlx::query_as::<_, Staff>(&format!(
            "INSERT INTO staff (name, phone, role) \
             VALUES ($1, $2, COALESCE($3, 'field')) \
             RETURNING {COLUMNS}"
        ))
        .bind(&input.name)
        .bind(&input.phone)
        .bind(&input.role)
        .fetch_one(pool)
        .await
    }

    /// Fetch a staff member by id.
    pub async fn get(pool: &PgPool, id: DbId) -> Result<Option<Staff>, sqlx::Error> {
        sqlx::query_as::<_, Staff>(&format!("SELECT {COLUMNS} FROM staff WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch a staff member by unique phone identifier.
    pub async fn find_by_phone(pool: &PgPool, phone: &str) -> Result<Option<Staff>, sqlx::Error> {
        sqlx::query_as::<_, Staff>(&format!("SELECT {COLUMNS} FROM staff WHERE phone = $1"))
            .bind(phone)
            .fetch_optional(pool)
            .await
    }

    /// List all staff, newest first (admin listing).
    pub async fn list(pool: &PgPool) -> Result<Vec<Staff>, sqlx::Error> {
        sqlx::query_as::<_, Staff>(&format!(
            "SELECT {COLUMNS} FROM staff ORDER BY created_at DESC"
        ))
        .fetch_all(pool)
        .await
    }

    /// List all staff by display name (projection grid ordering).
    pub async fn list_by_name(pool: &PgPool) -> Result<Vec<Staff>, sqlx::Error> {
        sqlx::query_as::<_, Staff>(&format!("SELECT {COLUMNS} FROM staff ORDER BY name ASC"))
            .fetch_all(pool)
            .await
    }

    /// Patch a staff member; unset fields keep their current values.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateStaff,
    ) -> Result<Option<Staff>, sqlx::Error> {
        sqlx::query_as::<_, Staff>(&format!(
            "UPDATE staff SET \
                 name = COALESCE($2, name), \
                 phone = COALESCE($3, phone), \
                 role = COALESCE($4, role), \
                 is_active = COALESCE($5, is_active), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&input.name)
        .bind(&input.phone)
        .bind(&input.role)
        .bind(input.is_active)
        .fetch_optional(pool)
        .await
    }

    /// Delete a staff member; their assignments cascade. Historical action
    /// logs cascade with the assignment, not independently.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM staff WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Total number of staff (dashboard).
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM staff")
            .fetch_one(pool)
            .await
    }
}
