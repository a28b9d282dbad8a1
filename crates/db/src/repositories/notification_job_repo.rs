//! Repository for the `notification_jobs` queue.
//!
//! Claiming uses `FOR UPDATE SKIP LOCKED` so any number of worker tasks can
//! drain the queue without double-sending; retry state (`attempts`,
//! `next_attempt_at`) is persisted so a crashed worker never loses a retry.

use rota_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::notification_job::{NewNotificationJob, NotificationJob};

/// Column list for `notification_jobs` queries.
const COLUMNS: &str = "id, kind, recipient_phone, body, status, attempts, \
     next_attempt_at, last_error, created_at, updated_at";

/// Queue operations for notification jobs.
pub struct NotificationJobRepo;

impl NotificationJobRepo {
    /// Enqueue one job, returning the generated id.
    pub async fn enqueue(pool: &PgPool, job: &NewNotificationJob) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO notification_jobs (kind, recipient_phone, body) \
             VALUES ($1, $2, $3) \
             RETURNING id",
        )
        .bind(job.kind)
        .bind(&job.recipient_phone)
        .bind(&job.body)
        .fetch_one(pool)
        .await
    }

    /// Claim the next due job, moving it to `SENDING`.
    ///
    /// `SKIP LOCKED` lets concurrent workers claim disjoint jobs; `None`
    /// means the queue is currently drained.
    pub async fn claim_next(pool: &PgPool) -> Result<Option<NotificationJob>, sqlx::Error> {
        sqlx::query_as::<_, NotificationJob>(&format!(
            "UPDATE notification_jobs SET status = 'SENDING', updated_at = NOW() \
             WHERE id = ( \
                 SELECT id FROM notification_jobs \
                 WHERE status = 'QUEUED' AND next_attempt_at <= NOW() \
                 ORDER BY id \
                 LIMIT 1 \
                 FOR UPDATE SKIP LOCKED \
             ) \
             RETURNING {COLUMNS}"
        ))
        .fetch_optional(pool)
        .await
    }

    /// Mark a claimed job as delivered.
    pub async fn mark_sent(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE notification_jobs \
             SET status = 'SENT', updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Return a failed job to the queue for a later attempt.
    pub async fn schedule_retry(
        pool: &PgPool,
        id: DbId,
        attempts: i32,
        next_attempt_at: Timestamp,
        error: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE notification_jobs \
             SET status = 'QUEUED', attempts = $2, next_attempt_at = $3, \
                 last_error = $4, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(attempts)
        .bind(next_attempt_at)
        .bind(error)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Mark a job permanently failed after exhausting its retries.
    pub async fn mark_failed(
        pool: &PgPool,
        id: DbId,
        attempts: i32,
        error: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE notification_jobs \
             SET status = 'FAILED', attempts = $2, last_error = $3, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(attempts)
        .bind(error)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Fetch a job by id (tests and diagnostics).
    pub async fn get(pool: &PgPool, id: DbId) -> Result<Option<NotificationJob>, sqlx::Error> {
        sqlx::query_as::<_, NotificationJob>(&format!(
            "SELECT {COLUMNS} FROM notification_jobs WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// List jobs by status, oldest first (diagnostics).
    pub async fn list_by_status(
        pool: &PgPool,
        status: &str,
    ) -> Result<Vec<NotificationJob>, sqlx::Error> {
        sqlx::query_as::<_, NotificationJob>(&format!(
            "SELECT {COLUMNS} FROM notification_jobs WHERE status = $1 ORDER BY id"
        ))
        .bind(status)
        .fetch_all(pool)
        .await
    }
}
