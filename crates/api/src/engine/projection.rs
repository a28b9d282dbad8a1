//! Read-only schedule projections.
//!
//! Joins duty definitions with per-date execution records to produce the
//! staff "today" view and the week-by-staff grid. A date with no record is a
//! display question, not a stored state: future (and current) dates show
//! `PENDING`; past dates show `PENDING` or a distinct `MISSED` marker
//! depending on the configured policy.

use std::collections::HashMap;

use chrono::{Datelike, Days, NaiveDate, NaiveTime};
use serde::Serialize;

use rota_core::lifecycle::ExecutionStatus;
use rota_core::schedule::{Weekday, ALL_WEEKDAYS};
use rota_core::types::{DbId, Timestamp};
use rota_db::models::execution::ExecutionRecord;
use rota_db::repositories::{AssignmentRepo, ExecutionRepo, StaffRepo};
use rota_db::DbPool;

use crate::config::MissedDisplay;
use crate::error::AppResult;

/// Display marker for a past, never-started occurrence under the `missed`
/// policy. Never persisted.
pub const STATUS_MISSED: &str = "MISSED";

// ---------------------------------------------------------------------------
// View types
// ---------------------------------------------------------------------------

/// One of today's duties for a staff member, annotated with today's
/// execution state.
#[derive(Debug, Serialize)]
pub struct TodayTask {
    pub assignment_id: DbId,
    pub site_id: DbId,
    pub site_name: String,
    pub duty_type: String,
    pub schedule_start: NaiveTime,
    pub schedule_end: NaiveTime,
    pub status: String,
    pub is_late: bool,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub execution_id: Option<DbId>,
}

/// The whole current week for every staff member.
#[derive(Debug, Serialize)]
pub struct WeeklySchedule {
    /// Monday of the projected week.
    pub week_start: NaiveDate,
    pub staff: Vec<StaffWeek>,
}

/// One staff member's row in the weekly grid.
#[derive(Debug, Serialize)]
pub struct StaffWeek {
    pub staff_id: DbId,
    pub staff_name: String,
    pub days: Vec<DayCell>,
}

/// One weekday cell in the grid.
#[derive(Debug, Serialize)]
pub struct DayCell {
    pub day: Weekday,
    pub date: NaiveDate,
    pub tasks: Vec<DayTask>,
}

/// One duty inside a day cell.
#[derive(Debug, Serialize)]
pub struct DayTask {
    pub assignment_id: DbId,
    pub duty_type: String,
    pub site_name: String,
    pub schedule_start: NaiveTime,
    pub schedule_end: NaiveTime,
    pub status: String,
    pub is_late: bool,
}

// ---------------------------------------------------------------------------
// Projector
// ---------------------------------------------------------------------------

/// Builds read models from the schedule store.
pub struct ScheduleProjector {
    pool: DbPool,
    missed_display: MissedDisplay,
}

impl ScheduleProjector {
    pub fn new(pool: DbPool, missed_display: MissedDisplay) -> Self {
        Self {
            pool,
            missed_display,
        }
    }

    /// A staff member's duties for `today`, pre-filtered to today's weekday
    /// and joined with today's execution records, earliest window first.
    pub async fn today_for_staff(
        &self,
        staff_id: DbId,
        today: NaiveDate,
    ) -> AppResult<Vec<TodayTask>> {
        let weekday = Weekday::from_chrono(today.weekday());

        let assignments = AssignmentRepo::list_details_for_staff(&self.pool, staff_id).await?;
        let todays: Vec<_> = assignments
            .into_iter()
            .filter(|a| a.scheduled_days.iter().any(|d| d == weekday.as_str()))
            .collect();

        let ids: Vec<DbId> = todays.iter().map(|a| a.id).collect();
        let records = ExecutionRepo::list_for_range(&self.pool, &ids, today, today).await?;
        let by_assignment: HashMap<DbId, &ExecutionRecord> =
            records.iter().map(|r| (r.assignment_id, r)).collect();

        Ok(todays
            .into_iter()
            .map(|a| {
                let record = by_assignment.get(&a.id);
                TodayTask {
                    assignment_id: a.id,
                    site_id: a.site_id,
                    site_name: a.site_name,
                    duty_type: a.duty_type,
                    schedule_start: a.schedule_start,
                    schedule_end: a.schedule_end,
                    status: record
                        .map(|r| r.status.clone())
                        .unwrap_or_else(|| ExecutionStatus::Pending.as_str().to_string()),
                    is_late: record.map(|r| r.is_late).unwrap_or(false),
                    started_at: record.and_then(|r| r.started_at),
                    completed_at: record.and_then(|r| r.completed_at),
                    execution_id: record.map(|r| r.id),
                }
            })
            .collect())
    }

    /// The week-by-staff grid for the calendar week containing `today`.
    pub async fn weekly(&self, today: NaiveDate) -> AppResult<WeeklySchedule> {
        let week_start = today
            .checked_sub_days(Days::new(today.weekday().num_days_from_monday() as u64))
            .expect("week start is representable");
        let week_end = week_start
            .checked_add_days(Days::new(6))
            .expect("week end is representable");

        let staff_list = StaffRepo::list_by_name(&self.pool).await?;
        let assignments = AssignmentRepo::list_details(&self.pool).await?;

        let ids: Vec<DbId> = assignments.iter().map(|a| a.id).collect();
        let records = ExecutionRepo::list_for_range(&self.pool, &ids, week_start, week_end).await?;
        let by_key: HashMap<(DbId, NaiveDate), &ExecutionRecord> = records
            .iter()
            .map(|r| ((r.assignment_id, r.date), r))
            .collect();

        let staff = staff_list
            .into_iter()
            .map(|member| {
                let days = ALL_WEEKDAYS
                    .iter()
                    .enumerate()
                    .map(|(offset, weekday)| {
                        let date = week_start
                            .checked_add_days(Days::new(offset as u64))
                            .expect("week dates are representable");

                        let tasks = assignments
                            .iter()
                            .filter(|a| {
                                a.staff_id == member.id
                                    && a.scheduled_days.iter().any(|d| d == weekday.as_str())
                            })
                            .map(|a| {
                                let record = by_key.get(&(a.id, date)).copied();
                                let (status, is_late) = self.display_status(record, date, today);
                                DayTask {
                                    assignment_id: a.id,
                                    duty_type: a.duty_type.clone(),
                                    site_name: a.site_name.clone(),
                                    schedule_start: a.schedule_start,
                                    schedule_end: a.schedule_end,
                                    status,
                                    is_late,
                                }
                            })
                            .collect();

                        DayCell {
                            day: *weekday,
                            date,
                            tasks,
                        }
                    })
                    .collect();

                StaffWeek {
                    staff_id: member.id,
                    staff_name: member.name,
                    days,
                }
            })
            .collect();

        Ok(WeeklySchedule { week_start, staff })
    }

    /// Resolve the displayed status for one occurrence cell.
    fn display_status(
        &self,
        record: Option<&ExecutionRecord>,
        date: NaiveDate,
        today: NaiveDate,
    ) -> (String, bool) {
        match record {
            Some(r) => (r.status.clone(), r.is_late),
            None if date < today && self.missed_display == MissedDisplay::Missed => {
                (STATUS_MISSED.to_string(), false)
            }
            None => (ExecutionStatus::Pending.as_str().to_string(), false),
        }
    }
}
