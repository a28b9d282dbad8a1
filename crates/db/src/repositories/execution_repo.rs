//! Repository for the `execution_records` table.
//!
//! Records are keyed by `(assignment_id, date)`; the unique constraint
//! `uq_execution_records_assignment_date` is what serializes concurrent
//! start attempts: at most one insert wins and the loser surfaces a conflict.
//! The `_tx` methods participate in the lifecycle engine's transaction so a
//! record write and its audit log entry commit atomically.

use chrono::NaiveDate;
use rota_core::types::{DbId, Timestamp};
use sqlx::{PgConnection, PgPool};

use crate::models::execution::ExecutionRecord;

/// Column list for `execution_records` queries.
const COLUMNS: &str = "id, assignment_id, date, status, is_late, started_at, \
     completed_at, distance_meters, created_at, updated_at";

/// Provides reads and transition writes for execution records.
pub struct ExecutionRepo;

impl ExecutionRepo {
    /// Fetch the record for one assignment on one date.
    pub async fn find_for_date(
        pool: &PgPool,
        assignment_id: DbId,
        date: NaiveDate,
    ) -> Result<Option<ExecutionRecord>, sqlx::Error> {
        sqlx::query_as::<_, ExecutionRecord>(&format!(
            "SELECT {COLUMNS} FROM execution_records \
             WHERE assignment_id = $1 AND date = $2"
        ))
        .bind(assignment_id)
        .bind(date)
        .fetch_optional(pool)
        .await
    }

    /// Transactional variant of [`find_for_date`](Self::find_for_date) that
    /// row-locks the record for the duration of the caller's transaction.
    pub async fn find_for_date_tx(
        conn: &mut PgConnection,
        assignment_id: DbId,
        date: NaiveDate,
    ) -> Result<Option<ExecutionRecord>, sqlx::Error> {
        sqlx::query_as::<_, ExecutionRecord>(&format!(
            "SELECT {COLUMNS} FROM execution_records \
             WHERE assignment_id = $1 AND date = $2 \
             FOR UPDATE"
        ))
        .bind(assignment_id)
        .bind(date)
        .fetch_optional(conn)
        .await
    }

    /// Materialize a record in its started state. Fails with a unique
    /// violation if another start won the race for this date.
    #[allow(clippy::too_many_arguments)]
    pub async fn insert_started_tx(
        conn: &mut PgConnection,
        assignment_id: DbId,
        date: NaiveDate,
        status: &str,
        is_late: bool,
        started_at: Timestamp,
        distance_meters: f64,
    ) -> Result<ExecutionRecord, sqlx::Error> {
        sqlx::query_as::<_, ExecutionRecord>(&format!(
            "INSERT INTO execution_records \
                 (assignment_id, date, status, is_late, started_at, distance_meters) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        ))
        .bind(assignment_id)
        .bind(date)
        .bind(status)
        .bind(is_late)
        .bind(started_at)
        .bind(distance_meters)
        .fetch_one(conn)
        .await
    }

    /// Move an existing (still pending) record into its started state.
    #[allow(clippy::too_many_arguments)]
    pub async fn mark_started_tx(
        conn: &mut PgConnection,
        record_id: DbId,
        status: &str,
        is_late: bool,
        started_at: Timestamp,
        distance_meters: f64,
    ) -> Result<ExecutionRecord, sqlx::Error> {
        sqlx::query_as::<_, ExecutionRecord>(&format!(
            "UPDATE execution_records SET \
                 status = $2, \
                 is_late = $3, \
                 started_at = $4, \
                 distance_meters = $5, \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(record_id)
        .bind(status)
        .bind(is_late)
        .bind(started_at)
        .bind(distance_meters)
        .fetch_one(conn)
        .await
    }

    /// Move a record into its completed state.
    pub async fn mark_completed_tx(
        conn: &mut PgConnection,
        record_id: DbId,
        status: &str,
        completed_at: Timestamp,
    ) -> Result<ExecutionRecord, sqlx::Error> {
        sqlx::query_as::<_, ExecutionRecord>(&format!(
            "UPDATE execution_records SET \
                 status = $2, \
                 completed_at = $3, \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(record_id)
        .bind(status)
        .bind(completed_at)
        .fetch_one(conn)
        .await
    }

    /// Number of records on `date` that ran late at start or completion
    /// (dashboard).
    pub async fn count_late_for_date(pool: &PgPool, date: NaiveDate) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM execution_records \
             WHERE date = $1 AND (is_late = TRUE OR status = 'COMPLETED_LATE')",
        )
        .bind(date)
        .fetch_one(pool)
        .await
    }

    /// All records for the given assignments within `[from, to]`, for the
    /// weekly projection.
    pub async fn list_for_range(
        pool: &PgPool,
        assignment_ids: &[DbId],
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<ExecutionRecord>, sqlx::Error> {
        sqlx::query_as::<_, ExecutionRecord>(&format!(
            "SELECT {COLUMNS} FROM execution_records \
             WHERE assignment_id = ANY($1) AND date BETWEEN $2 AND $3"
        ))
        .bind(assignment_ids)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await
    }
}
