//! Notification queue job models.

use rota_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Job kind: a lifecycle-triggered resident notification.
pub const JOB_KIND_TASK_STARTED: &str = "task_started";
/// Job kind: a bulk announcement to a caller-supplied recipient list.
pub const JOB_KIND_ANNOUNCEMENT: &str = "announcement";

/// Queue statuses.
pub const JOB_STATUS_QUEUED: &str = "QUEUED";
pub const JOB_STATUS_SENDING: &str = "SENDING";
pub const JOB_STATUS_SENT: &str = "SENT";
pub const JOB_STATUS_FAILED: &str = "FAILED";

/// A row from the `notification_jobs` table: one rendered message for one
/// recipient, drained by the worker pool with retry/backoff.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NotificationJob {
    pub id: DbId,
    pub kind: String,
    pub recipient_phone: String,
    pub body: String,
    pub status: String,
    pub attempts: i32,
    pub next_attempt_at: Timestamp,
    pub last_error: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert payload for a queue job.
#[derive(Debug, Clone)]
pub struct NewNotificationJob {
    pub kind: &'static str,
    pub recipient_phone: String,
    pub body: String,
}
