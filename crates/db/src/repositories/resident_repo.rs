//! Repository for the `residents` table.

use rota_core::types::DbId;
use sqlx::PgPool;

use crate::models::resident::{CreateResident, Resident};

/// Column list for `residents` queries.
const COLUMNS: &str =
    "id, site_id, first_name, last_name, unit_number, resident_type, phone, created_at";

/// Provides CRUD operations for residents.
pub struct ResidentRepo;

impl ResidentRepo {
    /// Create a resident under a site.
    pub async fn create(
        pool: &PgPool,
        site_id: DbId,
        input: &CreateResident,
    ) -> Result<Resident, sqlx::Error> {
        sqlx::query_as::<_, Resident>(&format!(
            "INSERT INTO residents \
                 (site_id, first_name, last_name, unit_number, resident_type, phone) \
             VALUES ($1, $2, $3, $4, COALESCE($5, 'OWNER'), $6) \
             RETURNING {COLUMNS}"
        ))
        .bind(site_id)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.unit_number)
        .bind(&input.resident_type)
        .bind(&input.phone)
        .fetch_one(pool)
        .await
    }

    /// List a site's residents, ordered by unit then name for stable
    /// admin listings.
    pub async fn list_for_site(pool: &PgPool, site_id: DbId) -> Result<Vec<Resident>, sqlx::Error> {
        sqlx::query_as::<_, Resident>(&format!(
            "SELECT {COLUMNS} FROM residents \
             WHERE site_id = $1 \
             ORDER BY unit_number NULLS LAST, last_name, first_name"
        ))
        .bind(site_id)
        .fetch_all(pool)
        .await
    }

    /// Delete a resident.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM residents WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
