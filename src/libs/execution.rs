//! Execution domain types and the in-memory state of a running block.
//!
//! A run moves `NotStarted -> InProgress -> Completed`. The `in_progress`
//! row is written when the run starts; subtask toggles stay in an
//! [`ActiveExecution`] until the run is finished, when they are written as
//! one snapshot.

use crate::libs::error::{CoreError, CoreResult};
use crate::libs::messages::Message;
use chrono::{Duration, NaiveDateTime};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use std::fmt;

/// Trailing window of the weekly streak.
pub const STREAK_WINDOW_DAYS: i64 = 7;

/// Name shown for history rows whose block is gone and carried no snapshot.
pub const UNKNOWN_BLOCK: &str = "Unknown block";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStatus {
    InProgress,
    Completed,
}

impl ExecutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionStatus::InProgress => "in_progress",
            ExecutionStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionStatus::InProgress => write!(f, "in progress"),
            ExecutionStatus::Completed => write!(f, "completed"),
        }
    }
}

impl ToSql for ExecutionStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for ExecutionStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "in_progress" => Ok(ExecutionStatus::InProgress),
            "completed" => Ok(ExecutionStatus::Completed),
            other => Err(FromSqlError::Other(format!("unknown execution status '{}'", other).into())),
        }
    }
}

/// A stored `block_executions` row.
#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    pub id: i64,
    pub block_id: i64,
    pub block_name: Option<String>,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub status: ExecutionStatus,
    pub origin_event_id: Option<i64>,
}

/// Row of the history list. `block_name` is the live name when the block
/// still exists, otherwise the snapshot taken at start.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub execution_id: i64,
    pub block_id: i64,
    pub block_name: String,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub status: ExecutionStatus,
}

impl HistoryEntry {
    pub fn duration(&self) -> Option<Duration> {
        self.end_time.map(|end| end - self.start_time)
    }
}

/// One subtask of a run as submitted to `finish`.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtaskCompletion {
    pub subtask_id: i64,
    pub name: String,
    pub completed: bool,
}

/// Stored completion of one subtask in a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtaskStatus {
    pub execution_id: i64,
    pub subtask_id: i64,
    pub subtask_name: String,
    pub is_completed: bool,
}

/// A run in progress. Nothing here is persisted until the run is finished.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveExecution {
    pub execution_id: i64,
    pub block_id: i64,
    pub block_name: String,
    pub started_at: NaiveDateTime,
    pub subtasks: Vec<SubtaskCompletion>,
}

impl ActiveExecution {
    /// Flips the subtask at `index` and returns its new state.
    pub fn toggle(&mut self, index: usize) -> CoreResult<bool> {
        let total = self.subtasks.len();
        let subtask = self
            .subtasks
            .get_mut(index)
            .ok_or_else(|| CoreError::validation(Message::SubtaskIndexOutOfRange { index, total }))?;
        subtask.completed = !subtask.completed;
        Ok(subtask.completed)
    }

    /// `(completed, total)`
    pub fn progress(&self) -> (usize, usize) {
        let done = self.subtasks.iter().filter(|s| s.completed).count();
        (done, self.subtasks.len())
    }

    pub fn is_all_done(&self) -> bool {
        self.subtasks.iter().all(|s| s.completed)
    }

    pub fn completion_list(&self) -> Vec<SubtaskCompletion> {
        self.subtasks.clone()
    }
}

/// Completed runs that ended inside `[now - 7 days, now]`.
///
/// The floor is the exact instant seven days before `now`, not the start of
/// that calendar day. Runs without an end time fall back to their start time.
pub fn compute_weekly_streak(history: &[HistoryEntry], now: NaiveDateTime) -> usize {
    let since = now - Duration::days(STREAK_WINDOW_DAYS);

    history
        .iter()
        .filter(|entry| entry.status == ExecutionStatus::Completed)
        .filter(|entry| {
            let at = entry.end_time.unwrap_or(entry.start_time);
            at >= since && at <= now
        })
        .count()
}
