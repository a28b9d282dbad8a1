use crate::types::DbId;

/// Domain-level error taxonomy.
///
/// Every variant is recoverable at the request boundary and maps onto a
/// structured HTTP response in the API crate. None of these should ever
/// crash the process.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The staff member already has an assignment on a shared weekday with
    /// an overlapping time window.
    #[error("This staff member already has an assignment in that time window (assignment #{conflicting_assignment_id})")]
    ScheduleConflict { conflicting_assignment_id: DbId },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A start attempt from outside the site geofence. Carries the measured
    /// distance and the configured radius for the user-facing message. This
    /// is a rejection outcome, never a persisted state.
    #[error("You are too far from the site ({distance_meters:.2} m). Maximum distance: {radius_meters} m")]
    ProximityDenied {
        distance_meters: f64,
        radius_meters: f64,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}
