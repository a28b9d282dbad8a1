//! The scheduling and execution engine: geofence verification, the task
//! lifecycle state machine, and read-model projections.

pub mod geofence;
pub mod lifecycle;
pub mod projection;

pub use geofence::{GeofenceChecker, ProximityCheck};
pub use lifecycle::{StartOutcome, TaskLifecycle};
pub use projection::ScheduleProjector;
