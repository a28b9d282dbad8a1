//! Handlers for the `/assignments` resource: CRUD plus the start/complete
//! lifecycle actions and the staff "today" view.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use rota_core::error::CoreError;
use rota_core::schedule;
use rota_core::types::DbId;
use rota_db::models::action_log::ActionLog;
use rota_db::models::assignment::{Assignment, AssignmentDetail, CreateAssignment, UpdateAssignment};
use rota_db::models::execution::ExecutionRecord;
use rota_db::repositories::{ActionLogRepo, AssignmentRepo, SiteRepo, StaffRepo};

use crate::engine::geofence::GeofenceChecker;
use crate::engine::lifecycle::TaskLifecycle;
use crate::engine::projection::{ScheduleProjector, TodayTask};
use crate::error::{AppError, AppResult};
use crate::middleware::actor::Actor;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body for `POST /assignments/{id}/start`.
#[derive(Debug, Deserialize)]
pub struct StartTask {
    pub longitude: f64,
    pub latitude: f64,
}

/// Body for `POST /assignments/{id}/complete`. Position is optional and
/// recorded for audit only.
#[derive(Debug, Default, Deserialize)]
pub struct CompleteTask {
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
}

/// Response for a successful start.
#[derive(Debug, Serialize)]
pub struct StartResponse {
    pub message: String,
    pub record: ExecutionRecord,
    pub distance_meters: f64,
    pub is_late: bool,
}

/// Response for a successful completion.
#[derive(Debug, Serialize)]
pub struct CompleteResponse {
    pub message: String,
    pub record: ExecutionRecord,
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/assignments (admin)
pub async fn list_assignments(
    actor: Actor,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<AssignmentDetail>>>> {
    actor.require_admin()?;

    let assignments = AssignmentRepo::list_details(&state.pool).await?;
    Ok(Json(DataResponse { data: assignments }))
}

/// GET /api/v1/assignments/my
///
/// The calling staff member's duties for today, pre-filtered to today's
/// weekday and joined with today's execution records.
pub async fn my_today(
    actor: Actor,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<TodayTask>>>> {
    let projector = ScheduleProjector::new(state.pool.clone(), state.config.missed_display);
    let today = chrono::Local::now().date_naive();
    let tasks = projector.today_for_staff(actor.staff_id, today).await?;
    Ok(Json(DataResponse { data: tasks }))
}

/// GET /api/v1/assignments/{id}
pub async fn get_assignment(
    _actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AssignmentDetail>>> {
    let assignment = AssignmentRepo::get_detail(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Assignment",
            id,
        })?;
    Ok(Json(DataResponse { data: assignment }))
}

/// POST /api/v1/assignments (admin)
///
/// Creates a recurring duty definition; rejected with 409 when it overlaps
/// one of the staff member's existing assignments.
pub async fn create_assignment(
    actor: Actor,
    State(state): State<AppState>,
    Json(input): Json<CreateAssignment>,
) -> AppResult<impl IntoResponse> {
    actor.require_admin()?;
    input.validate()?;

    let days = schedule::normalize_days(&input.scheduled_days)?;
    let day_codes: Vec<String> = days.iter().map(|d| d.as_str().to_string()).collect();
    let start = schedule::parse_time_of_day(&input.schedule_start)?;
    let end = schedule::parse_time_of_day(&input.schedule_end)?;
    schedule::validate_window(start, end)?;

    StaffRepo::get(&state.pool, input.staff_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Staff",
            id: input.staff_id,
        })?;
    SiteRepo::get(&state.pool, input.site_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Site",
            id: input.site_id,
        })?;

    let assignment = AssignmentRepo::create(
        &state.pool,
        input.staff_id,
        input.site_id,
        &input.duty_type,
        &day_codes,
        start,
        end,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: assignment })))
}

/// PUT /api/v1/assignments/{id} (admin)
///
/// Re-schedules an assignment. The conflict check excludes the assignment
/// itself so an unchanged window does not self-conflict.
pub async fn update_assignment(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAssignment>,
) -> AppResult<Json<DataResponse<Assignment>>> {
    actor.require_admin()?;
    input.validate()?;

    let current = AssignmentRepo::get(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Assignment",
            id,
        })?;

    let day_codes = match &input.scheduled_days {
        Some(days) => {
            let days = schedule::normalize_days(days)?;
            days.iter().map(|d| d.as_str().to_string()).collect()
        }
        None => current.scheduled_days.clone(),
    };
    let start = match &input.schedule_start {
        Some(value) => schedule::parse_time_of_day(value)?,
        None => current.schedule_start,
    };
    let end = match &input.schedule_end {
        Some(value) => schedule::parse_time_of_day(value)?,
        None => current.schedule_end,
    };
    schedule::validate_window(start, end)?;

    let assignment =
        AssignmentRepo::update_schedule(&state.pool, id, current.staff_id, &day_codes, start, end)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Assignment",
                id,
            })?;
    Ok(Json(DataResponse { data: assignment }))
}

/// DELETE /api/v1/assignments/{id} (admin)
///
/// Removes the assignment together with its execution records and audit
/// trail.
pub async fn delete_assignment(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    actor.require_admin()?;

    if !AssignmentRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Assignment",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/assignments/{id}/logs (admin)
pub async fn list_logs(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ActionLog>>>> {
    actor.require_admin()?;

    AssignmentRepo::get(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Assignment",
            id,
        })?;

    let logs = ActionLogRepo::list_for_assignment(&state.pool, id).await?;
    Ok(Json(DataResponse { data: logs }))
}

// ---------------------------------------------------------------------------
// Lifecycle actions
// ---------------------------------------------------------------------------

fn lifecycle(state: &AppState) -> TaskLifecycle {
    TaskLifecycle::new(
        state.pool.clone(),
        state.event_bus.clone(),
        GeofenceChecker::new(state.config.geofence_radius_meters),
    )
}

/// POST /api/v1/assignments/{id}/start
///
/// Starts today's occurrence. The caller must be the assigned staff member
/// and physically within the site geofence.
pub async fn start_task(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<StartTask>,
) -> AppResult<Json<DataResponse<StartResponse>>> {
    let now_local = chrono::Local::now().naive_local();
    let outcome = lifecycle(&state)
        .start(id, actor.staff_id, input.longitude, input.latitude, now_local)
        .await?;

    let message = if outcome.was_late {
        "Task started late. Residents are being notified."
    } else {
        "Task started. Residents are being notified."
    };

    Ok(Json(DataResponse {
        data: StartResponse {
            message: message.to_string(),
            distance_meters: outcome.distance_meters,
            is_late: outcome.was_late,
            record: outcome.record,
        },
    }))
}

/// POST /api/v1/assignments/{id}/complete
///
/// Completes today's occurrence. No proximity requirement; a supplied
/// position is recorded for audit.
pub async fn complete_task(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CompleteTask>,
) -> AppResult<Json<DataResponse<CompleteResponse>>> {
    let now_local = chrono::Local::now().naive_local();
    let record = lifecycle(&state)
        .complete(id, actor.staff_id, input.longitude, input.latitude, now_local)
        .await?;

    Ok(Json(DataResponse {
        data: CompleteResponse {
            message: "Task completed".to_string(),
            record,
        },
    }))
}
