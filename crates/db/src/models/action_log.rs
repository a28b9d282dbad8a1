//! Append-only audit log models for start/complete actions.

use rota_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `action_logs` table. Never mutated; removed only when the
/// parent assignment is deleted.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActionLog {
    pub id: DbId,
    pub assignment_id: DbId,
    pub staff_id: DbId,
    /// `START` or `COMPLETE`.
    pub action: String,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    /// Measured distance in meters; recorded for START only.
    pub distance_meters: Option<f64>,
    pub created_at: Timestamp,
}

/// Insert payload for an audit entry.
#[derive(Debug, Clone)]
pub struct NewActionLog {
    pub assignment_id: DbId,
    pub staff_id: DbId,
    pub action: &'static str,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub distance_meters: Option<f64>,
}

/// An audit entry joined with display names, for dashboards.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RecentActivity {
    pub id: DbId,
    pub assignment_id: DbId,
    pub action: String,
    pub staff_name: String,
    pub site_name: String,
    pub duty_type: String,
    pub created_at: Timestamp,
}
