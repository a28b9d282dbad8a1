//! Execution record models: one day's occurrence of an assignment.

use chrono::NaiveDate;
use rota_core::error::CoreError;
use rota_core::lifecycle::ExecutionStatus;
use rota_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `execution_records` table, composite-unique on
/// `(assignment_id, date)`. Created lazily on the first start attempt for
/// that date; a missing row for a past scheduled day means "never started".
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ExecutionRecord {
    pub id: DbId,
    pub assignment_id: DbId,
    pub date: NaiveDate,
    /// Stored status text; parse with [`ExecutionRecord::status`].
    pub status: String,
    pub is_late: bool,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    /// Measured distance at start, in meters.
    pub distance_meters: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ExecutionRecord {
    /// Typed view of the stored status. The column has a CHECK constraint,
    /// so a parse failure means the schema and the enum have diverged.
    pub fn status(&self) -> Result<ExecutionStatus, CoreError> {
        ExecutionStatus::parse(&self.status)
    }
}
