//! Repository for the `assignments` table, including the schedule conflict
//! check that guards every create/update.
//!
//! Two assignments for the same staff member conflict iff they share at
//! least one weekday and their half-open `[start, end)` windows overlap.
//! The check runs inside the same transaction as the write, serialized per
//! staff member with `pg_advisory_xact_lock`, so two concurrent creations
//! cannot both validate against a stale view.

use chrono::NaiveTime;
use rota_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::assignment::{Assignment, AssignmentDetail};

/// Column list for `assignments` queries.
const COLUMNS: &str = "id, staff_id, site_id, duty_type, scheduled_days, \
     schedule_start, schedule_end, created_at, updated_at";

/// Column list for assignment queries joined with staff and site names.
const DETAIL_COLUMNS: &str = "a.id, a.staff_id, a.site_id, a.duty_type, a.scheduled_days, \
     a.schedule_start, a.schedule_end, a.created_at, a.updated_at, \
     s.name AS staff_name, p.name AS site_name";

/// Error type for schedule-mutating writes.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleWriteError {
    /// The staff member already has an overlapping assignment.
    #[error("schedule conflict with assignment {0}")]
    Conflict(DbId),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Provides CRUD plus conflict checking for assignments.
pub struct AssignmentRepo;

impl AssignmentRepo {
    /// Create an assignment after a transactional conflict check.
    ///
    /// `scheduled_days` must already be normalized (non-empty, valid codes,
    /// deduplicated) and the window validated; this method owns only the
    /// overlap invariant.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        pool: &PgPool,
        staff_id: DbId,
        site_id: DbId,
        duty_type: &str,
        scheduled_days: &[String],
        schedule_start: NaiveTime,
        schedule_end: NaiveTime,
    ) -> Result<Assignment, ScheduleWriteError> {
        let mut tx = pool.begin().await?;

        Self::lock_staff_schedule(&mut *tx, staff_id).await?;
        if let Some(conflicting) = Self::find_conflict(
            &mut *tx,
            staff_id,
            scheduled_days,
            schedule_start,
            schedule_end,
            None,
        )
        .await?
        {
            return Err(ScheduleWriteError::Conflict(conflicting));
        }

        let assignment = sqlx::query_as::<_, Assignment>(&format!(
            "INSERT INTO assignments \
                 (staff_id, site_id, duty_type, scheduled_days, schedule_start, schedule_end) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        ))
        .bind(staff_id)
        .bind(site_id)
        .bind(duty_type)
        .bind(scheduled_days)
        .bind(schedule_start)
        .bind(schedule_end)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(assignment)
    }

    /// Re-schedule an existing assignment, excluding it from its own
    /// conflict check.
    pub async fn update_schedule(
        pool: &PgPool,
        id: DbId,
        staff_id: DbId,
        scheduled_days: &[String],
        schedule_start: NaiveTime,
        schedule_end: NaiveTime,
    ) -> Result<Option<Assignment>, ScheduleWriteError> {
        let mut tx = pool.begin().await?;

        Self::lock_staff_schedule(&mut *tx, staff_id).await?;
        if let Some(conflicting) = Self::find_conflict(
            &mut *tx,
            staff_id,
            scheduled_days,
            schedule_start,
            schedule_end,
            Some(id),
        )
        .await?
        {
            return Err(ScheduleWriteError::Conflict(conflicting));
        }

        let assignment = sqlx::query_as::<_, Assignment>(&format!(
            "UPDATE assignments SET \
                 scheduled_days = $2, \
                 schedule_start = $3, \
                 schedule_end = $4, \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(scheduled_days)
        .bind(schedule_start)
        .bind(schedule_end)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(assignment)
    }

    /// Non-transactional conflict probe for callers that only want the
    /// answer (e.g. a dry-run validation endpoint).
    pub async fn check_conflict(
        pool: &PgPool,
        staff_id: DbId,
        scheduled_days: &[String],
        schedule_start: NaiveTime,
        schedule_end: NaiveTime,
        exclude_assignment_id: Option<DbId>,
    ) -> Result<Option<DbId>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::find_conflict(
            &mut *conn,
            staff_id,
            scheduled_days,
            schedule_start,
            schedule_end,
            exclude_assignment_id,
        )
        .await
    }

    /// Fetch an assignment by id.
    pub async fn get(pool: &PgPool, id: DbId) -> Result<Option<Assignment>, sqlx::Error> {
        sqlx::query_as::<_, Assignment>(&format!("SELECT {COLUMNS} FROM assignments WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch an assignment with staff and site display names.
    pub async fn get_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AssignmentDetail>, sqlx::Error> {
        sqlx::query_as::<_, AssignmentDetail>(&format!(
            "SELECT {DETAIL_COLUMNS} FROM assignments a \
             JOIN staff s ON s.id = a.staff_id \
             JOIN sites p ON p.id = a.site_id \
             WHERE a.id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Admin listing: all assignments with names, newest first.
    pub async fn list_details(pool: &PgPool) -> Result<Vec<AssignmentDetail>, sqlx::Error> {
        sqlx::query_as::<_, AssignmentDetail>(&format!(
            "SELECT {DETAIL_COLUMNS} FROM assignments a \
             JOIN staff s ON s.id = a.staff_id \
             JOIN sites p ON p.id = a.site_id \
             ORDER BY a.created_at DESC"
        ))
        .fetch_all(pool)
        .await
    }

    /// One staff member's assignments in day order (earliest window first).
    pub async fn list_details_for_staff(
        pool: &PgPool,
        staff_id: DbId,
    ) -> Result<Vec<AssignmentDetail>, sqlx::Error> {
        sqlx::query_as::<_, AssignmentDetail>(&format!(
            "SELECT {DETAIL_COLUMNS} FROM assignments a \
             JOIN staff s ON s.id = a.staff_id \
             JOIN sites p ON p.id = a.site_id \
             WHERE a.staff_id = $1 \
             ORDER BY a.schedule_start ASC"
        ))
        .bind(staff_id)
        .fetch_all(pool)
        .await
    }

    /// A site's assignments with names, newest first.
    pub async fn list_details_for_site(
        pool: &PgPool,
        site_id: DbId,
    ) -> Result<Vec<AssignmentDetail>, sqlx::Error> {
        sqlx::query_as::<_, AssignmentDetail>(&format!(
            "SELECT {DETAIL_COLUMNS} FROM assignments a \
             JOIN staff s ON s.id = a.staff_id \
             JOIN sites p ON p.id = a.site_id \
             WHERE a.site_id = $1 \
             ORDER BY a.created_at DESC"
        ))
        .bind(site_id)
        .fetch_all(pool)
        .await
    }

    /// Delete an assignment and its dependents in one transaction.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM action_logs WHERE assignment_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM execution_records WHERE assignment_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM assignments WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of assignments scheduled on the given weekday (dashboard).
    pub async fn count_for_weekday(pool: &PgPool, weekday: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM assignments WHERE $1 = ANY(scheduled_days)")
            .bind(weekday)
            .fetch_one(pool)
            .await
    }

    /// Serialize check-then-write sequences for one staff member's schedule.
    ///
    /// An advisory lock keyed by staff id also excludes concurrent inserts,
    /// which row locks on existing assignments would not.
    async fn lock_staff_schedule(conn: &mut PgConnection, staff_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(staff_id)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Find one assignment of `staff_id` sharing a weekday with
    /// `scheduled_days` and overlapping the `[start, end)` window.
    async fn find_conflict(
        conn: &mut PgConnection,
        staff_id: DbId,
        scheduled_days: &[String],
        schedule_start: NaiveTime,
        schedule_end: NaiveTime,
        exclude_assignment_id: Option<DbId>,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT id FROM assignments \
             WHERE staff_id = $1 \
               AND scheduled_days && $2 \
               AND schedule_start < $4 \
               AND $3 < schedule_end \
               AND ($5::BIGINT IS NULL OR id <> $5) \
             ORDER BY id \
             LIMIT 1",
        )
        .bind(staff_id)
        .bind(scheduled_days)
        .bind(schedule_start)
        .bind(schedule_end)
        .bind(exclude_assignment_id)
        .fetch_optional(conn)
        .await
    }
}
