//! Handler for the weekly schedule projection.

use axum::extract::State;
use axum::Json;

use crate::engine::projection::{ScheduleProjector, WeeklySchedule};
use crate::error::AppResult;
use crate::middleware::actor::Actor;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/schedule/weekly
///
/// The week-by-staff grid for the current calendar week: every staff
/// member's duties per weekday, annotated with that date's execution status.
pub async fn weekly(
    _actor: Actor,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<WeeklySchedule>>> {
    let projector = ScheduleProjector::new(state.pool.clone(), state.config.missed_display);
    let today = chrono::Local::now().date_naive();
    let schedule = projector.weekly(today).await?;
    Ok(Json(DataResponse { data: schedule }))
}
