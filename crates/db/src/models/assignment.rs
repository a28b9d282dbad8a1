//! Assignment (recurring duty definition) models and DTOs.

use chrono::NaiveTime;
use rota_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `assignments` table: one staff member committed to one
/// site for a duty type on a set of weekdays within a daily time window.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Assignment {
    pub id: DbId,
    pub staff_id: DbId,
    pub site_id: DbId,
    pub duty_type: String,
    /// Weekday codes, MON..SUN, deduplicated.
    pub scheduled_days: Vec<String>,
    pub schedule_start: NaiveTime,
    pub schedule_end: NaiveTime,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An assignment joined with its staff and site display data, for listings
/// and for the lifecycle engine (which needs names for events).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssignmentDetail {
    pub id: DbId,
    pub staff_id: DbId,
    pub site_id: DbId,
    pub duty_type: String,
    pub scheduled_days: Vec<String>,
    pub schedule_start: NaiveTime,
    pub schedule_end: NaiveTime,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub staff_name: String,
    pub site_name: String,
}

/// DTO for creating an assignment. Times use `HH:MM` strings at the API
/// boundary and are parsed by the handler.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAssignment {
    pub staff_id: DbId,
    pub site_id: DbId,
    #[validate(length(min = 1, max = 50))]
    pub duty_type: String,
    #[validate(length(min = 1))]
    pub scheduled_days: Vec<String>,
    pub schedule_start: String,
    pub schedule_end: String,
}

/// DTO for updating an assignment's schedule.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAssignment {
    #[validate(length(min = 1))]
    pub scheduled_days: Option<Vec<String>>,
    pub schedule_start: Option<String>,
    pub schedule_end: Option<String>,
}
