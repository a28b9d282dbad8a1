//! Execution state machine for one day's occurrence of an assignment.
//!
//! States: `PENDING -> {IN_PROGRESS, LATE} -> {COMPLETED, COMPLETED_LATE}`.
//! `PENDING` is implicit; no record is materialized until a start attempt.
//! Lateness is derived at the moment of each transition by comparing the
//! wall-clock time-of-day against the duty's scheduled end (never the start),
//! at minute granularity. An out-of-range start attempt is rejected before
//! any transition and is never a stored state.

use chrono::{NaiveTime, Timelike};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Status of an execution record, persisted as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStatus {
    Pending,
    InProgress,
    Late,
    Completed,
    CompletedLate,
}

impl ExecutionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ExecutionStatus::Pending => "PENDING",
            ExecutionStatus::InProgress => "IN_PROGRESS",
            ExecutionStatus::Late => "LATE",
            ExecutionStatus::Completed => "COMPLETED",
            ExecutionStatus::CompletedLate => "COMPLETED_LATE",
        }
    }

    /// Parse a stored status value.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "PENDING" => Ok(ExecutionStatus::Pending),
            "IN_PROGRESS" => Ok(ExecutionStatus::InProgress),
            "LATE" => Ok(ExecutionStatus::Late),
            "COMPLETED" => Ok(ExecutionStatus::Completed),
            "COMPLETED_LATE" => Ok(ExecutionStatus::CompletedLate),
            other => Err(CoreError::Internal(format!(
                "Unknown execution status: {other}"
            ))),
        }
    }

    /// Terminal states allow no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ExecutionStatus::Completed | ExecutionStatus::CompletedLate
        )
    }

    /// Valid target states reachable from this one.
    pub fn valid_transitions(self) -> &'static [ExecutionStatus] {
        match self {
            ExecutionStatus::Pending => &[ExecutionStatus::InProgress, ExecutionStatus::Late],
            ExecutionStatus::InProgress | ExecutionStatus::Late => {
                &[ExecutionStatus::Completed, ExecutionStatus::CompletedLate]
            }
            ExecutionStatus::Completed | ExecutionStatus::CompletedLate => &[],
        }
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// Audit-log action kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Start,
    Complete,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Start => "START",
            ActionKind::Complete => "COMPLETE",
        }
    }
}

// ---------------------------------------------------------------------------
// Lateness and transitions
// ---------------------------------------------------------------------------

/// Whether `now` is past the scheduled end, at minute granularity.
///
/// Exactly at the scheduled end is still on time.
pub fn is_past_end(now: NaiveTime, end: NaiveTime) -> bool {
    (now.hour(), now.minute()) > (end.hour(), end.minute())
}

/// Status and lateness flag for a `start` at `now` against `schedule_end`.
pub fn status_on_start(now: NaiveTime, schedule_end: NaiveTime) -> (ExecutionStatus, bool) {
    if is_past_end(now, schedule_end) {
        (ExecutionStatus::Late, true)
    } else {
        (ExecutionStatus::InProgress, false)
    }
}

/// Status for a `complete` at `now` against `schedule_end`.
///
/// Independent of whether the start was late.
pub fn status_on_complete(now: NaiveTime, schedule_end: NaiveTime) -> ExecutionStatus {
    if is_past_end(now, schedule_end) {
        ExecutionStatus::CompletedLate
    } else {
        ExecutionStatus::Completed
    }
}

/// Guard for `start`: the day's record must be absent or still `PENDING`.
pub fn ensure_can_start(current: Option<ExecutionStatus>) -> Result<(), CoreError> {
    match current {
        None | Some(ExecutionStatus::Pending) => Ok(()),
        Some(_) => Err(CoreError::Conflict(
            "This task has already been started or completed today".to_string(),
        )),
    }
}

/// Guard for `complete`: the day's record must exist and be in progress.
pub fn ensure_can_complete(current: Option<ExecutionStatus>) -> Result<(), CoreError> {
    match current {
        Some(ExecutionStatus::InProgress) | Some(ExecutionStatus::Late) => Ok(()),
        _ => Err(CoreError::Conflict(
            "This task has not been started today".to_string(),
        )),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
