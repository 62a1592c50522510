//! Execution tracker store.
//!
//! Owns `block_executions` and `execution_subtask_status`. A run is written
//! as `in_progress` when it starts and closed with one transaction that
//! stamps the end time and stores the per-subtask snapshot.
//!
//! History rows keep the block and subtask names captured at the time of
//! the run, so deleting a block does not blank out its past runs.

use crate::db::blocks::{block_from_row, list_subtasks};
use crate::db::db::{logged_step, Db};
use crate::libs::error::{CoreError, CoreResult};
use crate::libs::execution::{
    ActiveExecution, Execution, ExecutionStatus, HistoryEntry, SubtaskCompletion, SubtaskStatus, UNKNOWN_BLOCK,
};
use crate::libs::formatter::{format_datetime, now};
use crate::libs::messages::Message;
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashSet;
use std::path::Path;

const SELECT_BLOCK: &str = "SELECT id, name, description, type, estimated_minutes, parent_id FROM blocks WHERE id = ?1";
const INSERT_EXECUTION: &str =
    "INSERT INTO block_executions (block_id, block_name, start_time, status, origin_event_id) VALUES (?1, ?2, ?3, ?4, ?5)";
const COMPLETE_EXECUTION: &str = "UPDATE block_executions SET end_time = ?2, status = 'completed' WHERE id = ?1 AND status = 'in_progress'";
const INSERT_STATUS: &str =
    "INSERT INTO execution_subtask_status (execution_id, subtask_id, subtask_name, is_completed) VALUES (?1, ?2, ?3, ?4)";
const DELETE_OPEN_EXECUTION: &str = "DELETE FROM block_executions WHERE id = ?1 AND status = 'in_progress'";
const SELECT_EXECUTION: &str =
    "SELECT id, block_id, block_name, start_time, end_time, status, origin_event_id FROM block_executions WHERE id = ?1";
const SELECT_EVENT_BLOCK: &str = "SELECT assigned_block_id FROM calendar_events WHERE id = ?1";
const SELECT_HISTORY: &str = "
    SELECT e.id, e.block_id, COALESCE(b.name, e.block_name, ?2), e.start_time, e.end_time, e.status
    FROM block_executions e
    LEFT JOIN blocks b ON b.id = e.block_id
    ORDER BY e.start_time DESC, e.id DESC
    LIMIT ?1
";
const SELECT_HISTORY_ENTRY: &str = "
    SELECT e.id, e.block_id, COALESCE(b.name, e.block_name, ?2), e.start_time, e.end_time, e.status
    FROM block_executions e
    LEFT JOIN blocks b ON b.id = e.block_id
    WHERE e.id = ?1
";
const SELECT_OPEN: &str = "
    SELECT e.id, e.block_id, COALESCE(b.name, e.block_name, ?1), e.start_time, e.end_time, e.status
    FROM block_executions e
    LEFT JOIN blocks b ON b.id = e.block_id
    WHERE e.status = 'in_progress'
    ORDER BY e.start_time, e.id
";
const SELECT_STATUSES: &str = "
    SELECT s.execution_id, s.subtask_id, COALESCE(s.subtask_name, t.name, ?2), s.is_completed
    FROM execution_subtask_status s
    LEFT JOIN subtasks t ON t.id = s.subtask_id
    WHERE s.execution_id = ?1
    ORDER BY s.rowid
";

const UNKNOWN_SUBTASK: &str = "Unknown subtask";

pub struct Executions {
    conn: Connection,
}

impl Executions {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self::from_db(Db::new()?))
    }

    pub fn open(path: impl AsRef<Path>) -> CoreResult<Self> {
        Ok(Self::from_db(Db::open(path)?))
    }

    pub fn from_db(db: Db) -> Self {
        Executions { conn: db.into_connection() }
    }

    /// Starts a run of a standard block (a plain block or a roulette
    /// option). A roulette container cannot run; spin it first.
    pub fn start(&mut self, block_id: i64, origin_event_id: Option<i64>) -> CoreResult<ActiveExecution> {
        self.start_at(block_id, origin_event_id, now())
    }

    pub fn start_at(&mut self, block_id: i64, origin_event_id: Option<i64>, started_at: NaiveDateTime) -> CoreResult<ActiveExecution> {
        let block = self
            .conn
            .query_row(SELECT_BLOCK, params![block_id], block_from_row)
            .optional()?
            .ok_or_else(|| CoreError::not_found("block", block_id))?;

        if block.is_roulette() {
            return Err(CoreError::validation(Message::RouletteNotRunnable(block.name)));
        }

        let subtasks = list_subtasks(&self.conn, block_id)?;
        self.conn.execute(
            INSERT_EXECUTION,
            params![
                block_id,
                block.name,
                format_datetime(&started_at),
                ExecutionStatus::InProgress,
                origin_event_id
            ],
        )?;
        let execution_id = self.conn.last_insert_rowid();

        tracing::info!(execution_id, block_id, subtasks = subtasks.len(), "execution started");

        Ok(ActiveExecution {
            execution_id,
            block_id,
            block_name: block.name,
            started_at,
            subtasks: subtasks
                .into_iter()
                .map(|s| SubtaskCompletion {
                    subtask_id: s.id,
                    name: s.name,
                    completed: false,
                })
                .collect(),
        })
    }

    /// Starts the block assigned to a calendar event, recording the event
    /// as the origin of the run.
    pub fn start_from_event(&mut self, event_id: i64) -> CoreResult<ActiveExecution> {
        let assigned: Option<i64> = self
            .conn
            .query_row(SELECT_EVENT_BLOCK, params![event_id], |row| row.get(0))
            .optional()?
            .ok_or_else(|| CoreError::not_found("event", event_id))?;

        let block_id = assigned.ok_or_else(|| CoreError::validation(Message::EventWithoutBlock(event_id)))?;
        self.start(block_id, Some(event_id))
    }

    /// Closes an in-progress run and stores the completion snapshot.
    pub fn finish(&mut self, execution_id: i64, completions: &[SubtaskCompletion]) -> CoreResult<()> {
        self.finish_at(execution_id, completions, now())
    }

    pub fn finish_at(&mut self, execution_id: i64, completions: &[SubtaskCompletion], ended_at: NaiveDateTime) -> CoreResult<()> {
        let mut seen = HashSet::new();
        for completion in completions {
            if !seen.insert(completion.subtask_id) {
                return Err(CoreError::validation(Message::DuplicateSubtask(completion.subtask_id)));
            }
        }

        let tx = self.conn.transaction()?;
        let changed = logged_step(
            "complete_execution",
            execution_id,
            tx.execute(COMPLETE_EXECUTION, params![execution_id, format_datetime(&ended_at)]),
        )?;

        if changed != 1 {
            drop(tx);
            return Err(match self.get(execution_id)? {
                None => CoreError::not_found("execution", execution_id),
                Some(_) => CoreError::validation(Message::ExecutionAlreadyCompleted(execution_id)),
            });
        }

        for completion in completions {
            logged_step(
                "insert_subtask_status",
                execution_id,
                tx.execute(
                    INSERT_STATUS,
                    params![execution_id, completion.subtask_id, completion.name, completion.completed],
                ),
            )?;
        }
        tx.commit()?;

        let done = completions.iter().filter(|c| c.completed).count();
        tracing::info!(execution_id, done, total = completions.len(), "execution completed");
        Ok(())
    }

    /// Removes a run that was started but will never be finished.
    pub fn abandon(&mut self, execution_id: i64) -> CoreResult<()> {
        let removed = self.conn.execute(DELETE_OPEN_EXECUTION, params![execution_id])?;
        if removed == 0 {
            return Err(match self.get(execution_id)? {
                None => CoreError::not_found("execution", execution_id),
                Some(_) => CoreError::validation(Message::ExecutionAlreadyCompleted(execution_id)),
            });
        }

        tracing::info!(execution_id, "execution abandoned");
        Ok(())
    }

    pub fn get(&self, execution_id: i64) -> CoreResult<Option<Execution>> {
        let execution = self
            .conn
            .query_row(SELECT_EXECUTION, params![execution_id], |row| {
                Ok(Execution {
                    id: row.get(0)?,
                    block_id: row.get(1)?,
                    block_name: row.get(2)?,
                    start_time: row.get(3)?,
                    end_time: row.get(4)?,
                    status: row.get(5)?,
                    origin_event_id: row.get(6)?,
                })
            })
            .optional()?;
        Ok(execution)
    }

    /// One run as a history row, named the same way `list_history` names it.
    pub fn get_entry(&self, execution_id: i64) -> CoreResult<Option<HistoryEntry>> {
        let entry = self
            .conn
            .query_row(SELECT_HISTORY_ENTRY, params![execution_id, UNKNOWN_BLOCK], history_from_row)
            .optional()?;
        Ok(entry)
    }

    /// Newest runs first.
    pub fn list_history(&self, limit: u32) -> CoreResult<Vec<HistoryEntry>> {
        let mut stmt = self.conn.prepare(SELECT_HISTORY)?;
        let history = stmt
            .query_map(params![limit, UNKNOWN_BLOCK], history_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(history)
    }

    /// Runs still marked in progress, oldest first.
    pub fn list_open(&self) -> CoreResult<Vec<HistoryEntry>> {
        let mut stmt = self.conn.prepare(SELECT_OPEN)?;
        let open = stmt.query_map(params![UNKNOWN_BLOCK], history_from_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(open)
    }

    pub fn list_subtask_statuses(&self, execution_id: i64) -> CoreResult<Vec<SubtaskStatus>> {
        let mut stmt = self.conn.prepare(SELECT_STATUSES)?;
        let statuses = stmt
            .query_map(params![execution_id, UNKNOWN_SUBTASK], |row| {
                Ok(SubtaskStatus {
                    execution_id: row.get(0)?,
                    subtask_id: row.get(1)?,
                    subtask_name: row.get(2)?,
                    is_completed: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(statuses)
    }
}

fn history_from_row(row: &Row) -> rusqlite::Result<HistoryEntry> {
    Ok(HistoryEntry {
        execution_id: row.get(0)?,
        block_id: row.get(1)?,
        block_name: row.get(2)?,
        start_time: row.get(3)?,
        end_time: row.get(4)?,
        status: row.get(5)?,
    })
}
