//! Repository for the `sites` table.

use rota_core::types::DbId;
use sqlx::PgPool;

use crate::models::site::{CreateSite, Site, UpdateSite};

/// Column list for `sites` queries.
const COLUMNS: &str = "id, name, address, longitude, latitude, created_at, updated_at";

/// Provides CRUD operations for sites.
pub struct SiteRepo;

impl SiteRepo {
    /// Create a site, returning the full row.
    pub async fn create(pool: &PgPool, input: &CreateSite) -> Result<Site, sqlx::Error> {
        sqlx::query_as::<_, Site>(&format!(
            "INSERT INTO sites (name, address, longitude, latitude) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        ))
        .bind(&input.name)
        .bind(&input.address)
        .bind(input.longitude)
        .bind(input.latitude)
        .fetch_one(pool)
        .await
    }

    /// Fetch a site by id.
    pub async fn get(pool: &PgPool, id: DbId) -> Result<Option<Site>, sqlx::Error> {
        sqlx::query_as::<_, Site>(&format!("SELECT {COLUMNS} FROM sites WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all sites, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Site>, sqlx::Error> {
        sqlx::query_as::<_, Site>(&format!(
            "SELECT {COLUMNS} FROM sites ORDER BY created_at DESC"
        ))
        .fetch_all(pool)
        .await
    }

    /// Patch a site; unset fields keep their current values.
    ///
    /// Returns `None` if the site does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSite,
    ) -> Result<Option<Site>, sqlx::Error> {
        sqlx::query_as::<_, Site>(&format!(
            "UPDATE sites SET \
                 name = COALESCE($2, name), \
                 address = COALESCE($3, address), \
                 longitude = COALESCE($4, longitude), \
                 latitude = COALESCE($5, latitude), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&input.name)
        .bind(&input.address)
        .bind(input.longitude)
        .bind(input.latitude)
        .fetch_optional(pool)
        .await
    }

    /// Delete a site. Residents and assignments (with their execution
    /// records and logs) go with it via the cascading foreign keys.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sites WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Total number of sites (dashboard).
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM sites")
            .fetch_one(pool)
            .await
    }
}
