//! The task lifecycle engine.
//!
//! Orchestrates `start` and `complete` transitions for one day's occurrence
//! of an assignment: actor ownership, the duplicate-start guard, geofence
//! verification (start only), lateness derivation against the scheduled
//! end, the atomic record-plus-audit-log write, and event emission.
//!
//! The record and its audit entry commit in one transaction; the event is
//! published only after commit, and publishing cannot fail; the physical
//! action already happened, so nothing downstream may roll it back.

use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};

use rota_core::error::CoreError;
use rota_core::lifecycle::{self, ActionKind};
use rota_core::types::DbId;
use rota_db::models::action_log::NewActionLog;
use rota_db::models::assignment::AssignmentDetail;
use rota_db::models::execution::ExecutionRecord;
use rota_db::repositories::{ActionLogRepo, AssignmentRepo, ExecutionRepo};
use rota_db::DbPool;
use rota_events::{EventBus, TaskEvent};

use crate::engine::geofence::GeofenceChecker;
use crate::error::{is_unique_violation, AppError, AppResult};

/// Unique constraint serializing concurrent starts per assignment and date.
const UQ_EXECUTION_DATE: &str = "uq_execution_records_assignment_date";

/// Result of a successful start.
#[derive(Debug)]
pub struct StartOutcome {
    pub record: ExecutionRecord,
    pub distance_meters: f64,
    pub was_late: bool,
}

/// Drives start/complete transitions.
pub struct TaskLifecycle {
    pool: DbPool,
    bus: Arc<EventBus>,
    geofence: GeofenceChecker,
}

impl TaskLifecycle {
    pub fn new(pool: DbPool, bus: Arc<EventBus>, geofence: GeofenceChecker) -> Self {
        Self {
            pool,
            bus,
            geofence,
        }
    }

    /// Start today's occurrence of an assignment.
    ///
    /// `now_local` is the wall-clock time at the site; it determines both
    /// the occurrence date and the lateness judgment.
    pub async fn start(
        &self,
        assignment_id: DbId,
        actor_staff_id: DbId,
        longitude: f64,
        latitude: f64,
        now_local: NaiveDateTime,
    ) -> AppResult<StartOutcome> {
        let assignment = self.load_owned(assignment_id, actor_staff_id, "start").await?;

        let today = now_local.date();

        // Cheap duplicate-start guard before the geofence round-trip. The
        // authoritative check re-runs under the row lock below.
        let existing = ExecutionRepo::find_for_date(&self.pool, assignment_id, today).await?;
        lifecycle::ensure_can_start(existing.as_ref().map(|r| r.status()).transpose()?)?;

        // Geofence gate: a rejection leaves no trace beyond the error.
        let check = self
            .geofence
            .verify(&self.pool, assignment.site_id, longitude, latitude)
            .await?;

        let (status, is_late) = lifecycle::status_on_start(now_local.time(), assignment.schedule_end);
        let started_at = Utc::now();

        let mut tx = self.pool.begin().await?;

        let record = match ExecutionRepo::find_for_date_tx(&mut *tx, assignment_id, today).await? {
            Some(existing) => {
                lifecycle::ensure_can_start(Some(existing.status()?))?;
                ExecutionRepo::mark_started_tx(
                    &mut *tx,
                    existing.id,
                    status.as_str(),
                    is_late,
                    started_at,
                    check.distance_meters,
                )
                .await?
            }
            None => ExecutionRepo::insert_started_tx(
                &mut *tx,
                assignment_id,
                today,
                status.as_str(),
                is_late,
                started_at,
                check.distance_meters,
            )
            .await
            .map_err(|e| {
                // A concurrent start inserted first; surface the same
                // conflict the guard above would have raised.
                if is_unique_violation(&e, UQ_EXECUTION_DATE) {
                    AppError::Core(CoreError::Conflict(
                        "This task has already been started or completed today".into(),
                    ))
                } else {
                    AppError::Database(e)
                }
            })?,
        };

        ActionLogRepo::append_tx(
            &mut *tx,
            &NewActionLog {
                assignment_id,
                staff_id: actor_staff_id,
                action: ActionKind::Start.as_str(),
                longitude: Some(longitude),
                latitude: Some(latitude),
                distance_meters: Some(check.distance_meters),
            },
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            assignment_id,
            staff_id = actor_staff_id,
            is_late,
            distance_meters = check.distance_meters,
            "Task started"
        );

        self.bus.publish(TaskEvent::TaskStarted {
            assignment_id,
            site_id: assignment.site_id,
            site_name: assignment.site_name.clone(),
            duty_type: assignment.duty_type.clone(),
            staff_name: assignment.staff_name.clone(),
            started_at,
            is_late,
        });

        Ok(StartOutcome {
            record,
            distance_meters: check.distance_meters,
            was_late: is_late,
        })
    }

    /// Complete today's occurrence of an assignment.
    ///
    /// No proximity check: a supplied position is recorded for audit only.
    pub async fn complete(
        &self,
        assignment_id: DbId,
        actor_staff_id: DbId,
        longitude: Option<f64>,
        latitude: Option<f64>,
        now_local: NaiveDateTime,
    ) -> AppResult<ExecutionRecord> {
        let assignment = self
            .load_owned(assignment_id, actor_staff_id, "complete")
            .await?;

        let today = now_local.date();
        let status = lifecycle::status_on_complete(now_local.time(), assignment.schedule_end);
        let completed_at = Utc::now();

        let mut tx = self.pool.begin().await?;

        let Some(existing) =
            ExecutionRepo::find_for_date_tx(&mut *tx, assignment_id, today).await?
        else {
            return Err(AppError::Core(CoreError::Conflict(
                "This task has not been started today".into(),
            )));
        };
        lifecycle::ensure_can_complete(Some(existing.status()?))?;

        let record =
            ExecutionRepo::mark_completed_tx(&mut *tx, existing.id, status.as_str(), completed_at)
                .await?;

        ActionLogRepo::append_tx(
            &mut *tx,
            &NewActionLog {
                assignment_id,
                staff_id: actor_staff_id,
                action: ActionKind::Complete.as_str(),
                longitude,
                latitude,
                distance_meters: None,
            },
        )
        .await?;

        tx.commit().await?;

        let completed_late = status == rota_core::lifecycle::ExecutionStatus::CompletedLate;
        tracing::info!(
            assignment_id,
            staff_id = actor_staff_id,
            completed_late,
            "Task completed"
        );

        self.bus.publish(TaskEvent::TaskCompleted {
            assignment_id,
            site_id: assignment.site_id,
            site_name: assignment.site_name.clone(),
            duty_type: assignment.duty_type.clone(),
            staff_name: assignment.staff_name.clone(),
            completed_at,
            completed_late,
        });

        Ok(record)
    }

    /// Load an assignment and verify the actor owns it.
    async fn load_owned(
        &self,
        assignment_id: DbId,
        actor_staff_id: DbId,
        verb: &str,
    ) -> AppResult<AssignmentDetail> {
        let assignment = AssignmentRepo::get_detail(&self.pool, assignment_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Assignment",
                id: assignment_id,
            })?;

        if assignment.staff_id != actor_staff_id {
            return Err(AppError::Core(CoreError::Forbidden(format!(
                "You are not allowed to {verb} this task"
            ))));
        }
        Ok(assignment)
    }
}
