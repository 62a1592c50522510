//! Storage gateway: connection setup and the generic statement entry point.
//!
//! [`Db::open`] configures the connection (foreign keys on, WAL journal,
//! busy timeout) and applies pending migrations, so opening is idempotent
//! and safe on every start. Typed stores (`Blocks`, `Executions`, ...) are
//! built from a `Db` and keep its connection.

use super::migrations::init_with_migrations;
use crate::libs::config::Config;
use crate::libs::data_storage::DataStorage;
use crate::libs::error::{CoreError, CoreResult};
use rusqlite::types::Value;
use rusqlite::{Connection, ToSql};
use std::path::Path;
use std::time::Duration;

pub const DB_FILE_NAME: &str = "kitty.db";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Result of [`Db::execute`].
#[derive(Debug, Clone, PartialEq)]
pub enum StatementOutcome {
    /// Rows returned by a query, one `Vec<Value>` per row in column order.
    Rows(Vec<Vec<Value>>),
    /// Row count touched by a write and the last inserted row id.
    Changed { changes: usize, inserted_id: i64 },
}

impl StatementOutcome {
    pub fn rows(&self) -> &[Vec<Value>] {
        match self {
            StatementOutcome::Rows(rows) => rows,
            StatementOutcome::Changed { .. } => &[],
        }
    }

    pub fn inserted_id(&self) -> Option<i64> {
        match self {
            StatementOutcome::Changed { inserted_id, .. } => Some(*inserted_id),
            StatementOutcome::Rows(_) => None,
        }
    }
}

pub struct Db {
    pub conn: Connection,
}

impl Db {
    /// Opens the store configured in `config.json` under the data directory.
    pub fn new() -> anyhow::Result<Db> {
        let storage = DataStorage::new();
        let config = Config::read_from(&storage)?;
        let path = config.database_path(&storage)?;
        Ok(Db::open(path)?)
    }

    pub fn open(path: impl AsRef<Path>) -> CoreResult<Db> {
        let mut conn = Self::open_without_migrations(path)?;
        init_with_migrations(&mut conn)?;
        Ok(Db { conn })
    }

    /// Private store that disappears with the connection.
    pub fn in_memory() -> CoreResult<Db> {
        let mut conn = Connection::open_in_memory()?;
        Self::configure(&conn)?;
        init_with_migrations(&mut conn)?;
        Ok(Db { conn })
    }

    /// Configured connection with no schema applied.
    pub fn open_without_migrations(path: impl AsRef<Path>) -> CoreResult<Connection> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        Self::configure(&conn)?;
        tracing::debug!(path = %path.display(), "database opened");
        Ok(conn)
    }

    fn configure(conn: &Connection) -> CoreResult<()> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        // journal_mode answers with the resulting mode ("memory" for in-memory stores)
        let _mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        Ok(())
    }

    /// Runs one parametrized statement.
    ///
    /// A statement that yields columns (`SELECT`, `VALUES`, `PRAGMA`,
    /// `... RETURNING`) returns its rows; any other statement returns the
    /// change count and the last inserted row id. Each call commits on its
    /// own.
    pub fn execute(&self, sql: &str, params: &[&dyn ToSql]) -> CoreResult<StatementOutcome> {
        let mut stmt = self.conn.prepare(sql)?;
        let column_count = stmt.column_count();

        if column_count == 0 {
            let changes = stmt.execute(params)?;
            return Ok(StatementOutcome::Changed {
                changes,
                inserted_id: self.conn.last_insert_rowid(),
            });
        }

        let mut rows = stmt.query(params)?;
        let mut collected = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(column_count);
            for index in 0..column_count {
                values.push(row.get::<_, Value>(index)?);
            }
            collected.push(values);
        }
        Ok(StatementOutcome::Rows(collected))
    }

    pub fn into_connection(self) -> Connection {
        self.conn
    }
}

/// Maps a failed statement inside a multi-step write to [`CoreError`],
/// logging which step failed before the transaction rolls back.
pub(crate) fn logged_step<T>(step: &'static str, subject: i64, result: rusqlite::Result<T>) -> CoreResult<T> {
    result.map_err(|error| {
        tracing::error!(step, subject, %error, "write step failed, rolling back");
        CoreError::from(error)
    })
}
