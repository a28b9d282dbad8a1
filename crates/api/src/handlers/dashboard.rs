//! Handler for the admin dashboard summary.

use axum::extract::State;
use axum::Json;
use chrono::Datelike;
use serde::Serialize;

use rota_core::schedule::Weekday;
use rota_db::models::action_log::RecentActivity;
use rota_db::repositories::{ActionLogRepo, AssignmentRepo, ExecutionRepo, SiteRepo, StaffRepo};

use crate::error::AppResult;
use crate::middleware::actor::Actor;
use crate::response::DataResponse;
use crate::state::AppState;

/// Number of recent activity entries shown on the dashboard.
const RECENT_LIMIT: i64 = 5;

/// Dashboard summary payload.
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_staff: i64,
    pub total_sites: i64,
    /// Assignments scheduled on today's weekday.
    pub today_tasks: i64,
    /// Today's occurrences that started or completed late.
    pub late_tasks: i64,
    pub recent_activities: Vec<RecentActivity>,
}

/// GET /api/v1/dashboard/stats (admin)
pub async fn stats(
    actor: Actor,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<DashboardStats>>> {
    actor.require_admin()?;

    let today = chrono::Local::now().date_naive();
    let weekday = Weekday::from_chrono(today.weekday());

    let total_staff = StaffRepo::count(&state.pool).await?;
    let total_sites = SiteRepo::count(&state.pool).await?;
    let today_tasks = AssignmentRepo::count_for_weekday(&state.pool, weekday.as_str()).await?;
    let late_tasks = ExecutionRepo::count_late_for_date(&state.pool, today).await?;
    let recent_activities = ActionLogRepo::list_recent(&state.pool, RECENT_LIMIT).await?;

    Ok(Json(DataResponse {
        data: DashboardStats {
            total_staff,
            total_sites,
            today_tasks,
            late_tasks,
            recent_activities,
        },
    }))
}
