//! Database schema migration management and versioning system.
//!
//! Every schema change is a numbered migration recorded in the `migrations`
//! table. Pending migrations run in version order inside one transaction
//! when a store is opened, so a fresh file and an old file converge on the
//! same schema.
//!
//! ## Schema Overview
//!
//! - **v1**: `blocks` (self-referential roulette options) and `subtasks`
//! - **v2**: `block_executions` and `execution_subtask_status`
//! - **v3**: `diary_entries`, `tags`, `diary_entry_tags`
//! - **v4**: `calendar_events` and `holidays`
//! - **v5**: `users`, `session`, `settings`
//! - **v6**: name snapshots on execution history rows
//!
//! `blocks.parent_id` and `subtasks.block_id` are foreign keys without a
//! cascade action: the store refuses to drop a parent before its children,
//! and the block manager deletes bottom-up. Execution history and calendar
//! assignments hold plain ids because they must outlive the blocks they
//! mention.
//!
//! ## Usage
//!
//! ```rust
//! use kitty::db::migrations::{init_with_migrations, get_db_version};
//! use rusqlite::Connection;
//!
//! let mut conn = Connection::open_in_memory()?;
//! init_with_migrations(&mut conn)?;
//! assert!(get_db_version(&conn)? > 0);
//! # Ok::<(), kitty::libs::error::CoreError>(())
//! ```

use crate::libs::error::CoreResult;
use crate::msg_debug;
use rusqlite::{params, Connection, Transaction};

/// SQL schema for the migrations tracking table.
const MIGRATIONS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

/// A single schema change.
#[derive(Debug, Clone)]
struct Migration {
    version: u32,
    name: &'static str,
    up: fn(&Transaction) -> rusqlite::Result<()>,
}

/// Registry of all migrations in version order.
pub struct MigrationManager {
    migrations: Vec<Migration>,
}

impl MigrationManager {
    pub fn new() -> Self {
        let mut manager = Self { migrations: Vec::new() };
        manager.register_migrations();
        manager
    }

    fn register_migrations(&mut self) {
        // Version 1: block hierarchy
        self.add_migration(1, "create_block_tables", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS blocks (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    description TEXT NOT NULL DEFAULT '',
                    type TEXT NOT NULL CHECK (type IN ('standard', 'roulette')),
                    estimated_minutes INTEGER NOT NULL DEFAULT 0 CHECK (estimated_minutes >= 0),
                    parent_id INTEGER,
                    FOREIGN KEY (parent_id) REFERENCES blocks(id)
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS subtasks (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    block_id INTEGER NOT NULL,
                    name TEXT NOT NULL,
                    position INTEGER NOT NULL DEFAULT 0,
                    FOREIGN KEY (block_id) REFERENCES blocks(id)
                )",
                [],
            )?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_blocks_parent_id ON blocks(parent_id)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_subtasks_block_id ON subtasks(block_id)", [])?;
            Ok(())
        });

        // Version 2: run tracking
        self.add_migration(2, "create_execution_tables", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS block_executions (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    block_id INTEGER NOT NULL,
                    start_time TIMESTAMP NOT NULL,
                    end_time TIMESTAMP,
                    status TEXT NOT NULL CHECK (status IN ('in_progress', 'completed')),
                    origin_event_id INTEGER
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS execution_subtask_status (
                    execution_id INTEGER NOT NULL,
                    subtask_id INTEGER NOT NULL,
                    is_completed BOOLEAN NOT NULL DEFAULT FALSE,
                    PRIMARY KEY (execution_id, subtask_id)
                )",
                [],
            )?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_executions_start_time ON block_executions(start_time)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_executions_block_id ON block_executions(block_id)", [])?;
            Ok(())
        });

        // Version 3: diary with tags
        self.add_migration(3, "create_diary_tables", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS diary_entries (
                    id INTEGER PRIMARY KEY,
                    date DATE NOT NULL UNIQUE,
                    mood INTEGER NOT NULL CHECK (mood BETWEEN 1 AND 5),
                    notes TEXT NOT NULL DEFAULT ''
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS tags (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL UNIQUE
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS diary_entry_tags (
                    entry_id INTEGER NOT NULL,
                    tag_id INTEGER NOT NULL,
                    PRIMARY KEY (entry_id, tag_id),
                    FOREIGN KEY (entry_id) REFERENCES diary_entries(id) ON DELETE CASCADE,
                    FOREIGN KEY (tag_id) REFERENCES tags(id) ON DELETE CASCADE
                )",
                [],
            )?;
            Ok(())
        });

        // Version 4: calendar
        self.add_migration(4, "create_calendar_tables", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS calendar_events (
                    id INTEGER PRIMARY KEY,
                    type TEXT NOT NULL CHECK (type IN ('event', 'task')),
                    title TEXT NOT NULL,
                    start_datetime TIMESTAMP NOT NULL,
                    end_datetime TIMESTAMP,
                    reminder INTEGER NOT NULL DEFAULT 0,
                    assigned_block_id INTEGER
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS holidays (
                    id INTEGER PRIMARY KEY,
                    date DATE NOT NULL UNIQUE,
                    name TEXT NOT NULL,
                    type TEXT
                )",
                [],
            )?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_events_start ON calendar_events(start_datetime)", [])?;
            Ok(())
        });

        // Version 5: local accounts, the persisted session and key/value settings
        self.add_migration(5, "create_account_tables", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS users (
                    id INTEGER PRIMARY KEY,
                    email TEXT NOT NULL UNIQUE,
                    password TEXT NOT NULL,
                    name TEXT NOT NULL DEFAULT '',
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS session (
                    id INTEGER PRIMARY KEY CHECK (id = 1),
                    user_id INTEGER NOT NULL,
                    started_at TIMESTAMP NOT NULL,
                    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS settings (
                    key TEXT PRIMARY KEY NOT NULL,
                    value TEXT NOT NULL
                )",
                [],
            )?;
            Ok(())
        });

        // Version 6: keep names readable after the referenced block is gone
        self.add_migration(6, "add_execution_snapshots", |tx| {
            tx.execute("ALTER TABLE block_executions ADD COLUMN block_name TEXT", [])?;
            tx.execute("ALTER TABLE execution_subtask_status ADD COLUMN subtask_name TEXT", [])?;
            Ok(())
        });
    }

    fn add_migration(&mut self, version: u32, name: &'static str, up: fn(&Transaction) -> rusqlite::Result<()>) {
        self.migrations.push(Migration { version, name, up });
    }

    /// Applies every migration newer than the recorded version.
    ///
    /// All pending migrations share one transaction: a failure leaves the
    /// schema exactly as it was.
    pub fn run_migrations(&self, conn: &mut Connection) -> CoreResult<()> {
        conn.execute(MIGRATIONS_TABLE, [])?;

        let current_version = self.get_current_version(conn)?;
        let pending: Vec<&Migration> = self.migrations.iter().filter(|m| m.version > current_version).collect();

        if pending.is_empty() {
            msg_debug!("Database is up to date");
            return Ok(());
        }

        let tx = conn.transaction()?;
        for migration in pending {
            tracing::info!(version = migration.version, name = migration.name, "applying migration");

            if let Err(error) = (migration.up)(&tx) {
                tracing::error!(version = migration.version, %error, "migration failed");
                return Err(error.into());
            }
            tx.execute(
                "INSERT INTO migrations (version, name) VALUES (?1, ?2)",
                params![migration.version, migration.name],
            )?;
        }
        tx.commit()?;

        Ok(())
    }

    fn get_current_version(&self, conn: &Connection) -> CoreResult<u32> {
        let version: Option<u32> = conn.query_row("SELECT MAX(version) FROM migrations", [], |row| row.get(0))?;
        Ok(version.unwrap_or(0))
    }

    pub fn is_migration_applied(&self, conn: &Connection, version: u32) -> CoreResult<bool> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM migrations WHERE version = ?1", params![version], |row| row.get(0))?;
        Ok(count > 0)
    }

    /// Applied migrations as `(version, name, applied_at)`, oldest first.
    pub fn get_migration_history(&self, conn: &Connection) -> CoreResult<Vec<(u32, String, String)>> {
        let mut stmt = conn.prepare("SELECT version, name, applied_at FROM migrations ORDER BY version")?;
        let history = stmt
            .query_map([], |row| Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(history)
    }

    pub fn latest_version(&self) -> u32 {
        self.migrations.last().map(|m| m.version).unwrap_or(0)
    }
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

pub fn init_with_migrations(conn: &mut Connection) -> CoreResult<()> {
    MigrationManager::new().run_migrations(conn)
}

/// Current schema version, 0 for an empty database.
pub fn get_db_version(conn: &Connection) -> CoreResult<u32> {
    conn.execute(MIGRATIONS_TABLE, [])?;
    MigrationManager::new().get_current_version(conn)
}

pub fn needs_migration(conn: &Connection) -> CoreResult<bool> {
    let manager = MigrationManager::new();
    Ok(get_db_version(conn)? < manager.latest_version())
}
