//! Detection and removal of rows whose owner no longer exists.
//!
//! Current writers cannot leave such rows behind, but a file written by an
//! older, non-transactional client may hold subtasks of deleted blocks,
//! options of deleted roulettes, or completion rows of deleted runs.

use crate::db::db::{logged_step, Db};
use crate::libs::error::CoreResult;
use rusqlite::Connection;
use std::path::Path;

const ORPHAN_OPTIONS: &str = "blocks WHERE parent_id IS NOT NULL AND parent_id NOT IN (SELECT id FROM blocks)";
const ORPHAN_SUBTASKS: &str = "subtasks WHERE block_id NOT IN (SELECT id FROM blocks)
    OR block_id IN (SELECT id FROM blocks WHERE parent_id IS NOT NULL AND parent_id NOT IN (SELECT id FROM blocks))";
const ORPHAN_STATUSES: &str = "execution_subtask_status WHERE execution_id NOT IN (SELECT id FROM block_executions)";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrphanReport {
    pub subtasks: usize,
    pub options: usize,
    pub statuses: usize,
}

impl OrphanReport {
    pub fn total(&self) -> usize {
        self.subtasks + self.options + self.statuses
    }

    pub fn is_clean(&self) -> bool {
        self.total() == 0
    }
}

pub struct Repair {
    conn: Connection,
}

impl Repair {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self::from_db(Db::new()?))
    }

    pub fn open(path: impl AsRef<Path>) -> CoreResult<Self> {
        Ok(Self::from_db(Db::open(path)?))
    }

    pub fn from_db(db: Db) -> Self {
        Repair { conn: db.into_connection() }
    }

    pub fn find_orphans(&self) -> CoreResult<OrphanReport> {
        let count = |from: &str| -> CoreResult<usize> {
            let sql = format!("SELECT COUNT(*) FROM {}", from);
            let n: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
            Ok(n as usize)
        };

        Ok(OrphanReport {
            subtasks: count(ORPHAN_SUBTASKS)?,
            options: count(ORPHAN_OPTIONS)?,
            statuses: count(ORPHAN_STATUSES)?,
        })
    }

    /// Deletes every orphan, subtasks first, in one transaction. Returns
    /// what was removed.
    pub fn repair(&mut self) -> CoreResult<OrphanReport> {
        let tx = self.conn.transaction()?;
        let subtasks = logged_step("delete_orphan_subtasks", 0, tx.execute(&format!("DELETE FROM {}", ORPHAN_SUBTASKS), []))?;
        let options = logged_step("delete_orphan_options", 0, tx.execute(&format!("DELETE FROM {}", ORPHAN_OPTIONS), []))?;
        let statuses = logged_step("delete_orphan_statuses", 0, tx.execute(&format!("DELETE FROM {}", ORPHAN_STATUSES), []))?;
        tx.commit()?;

        let report = OrphanReport { subtasks, options, statuses };
        if !report.is_clean() {
            tracing::warn!(subtasks, options, statuses, "orphaned rows removed");
        }
        Ok(report)
    }
}
