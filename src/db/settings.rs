use crate::db::db::Db;
use crate::libs::error::CoreResult;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Id of the roulette spun most recently, offered as the default next time.
pub const LAST_ROULETTE_KEY: &str = "last_roulette_id";

const SELECT_VALUE: &str = "SELECT value FROM settings WHERE key = ?1";
const UPSERT_VALUE: &str = "INSERT INTO settings (key, value) VALUES (?1, ?2) ON CONFLICT(key) DO UPDATE SET value = excluded.value";
const DELETE_VALUE: &str = "DELETE FROM settings WHERE key = ?1";

/// Key/value preferences kept inside the database file.
pub struct Settings {
    conn: Connection,
}

impl Settings {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self::from_db(Db::new()?))
    }

    pub fn open(path: impl AsRef<Path>) -> CoreResult<Self> {
        Ok(Self::from_db(Db::open(path)?))
    }

    pub fn from_db(db: Db) -> Self {
        Settings { conn: db.into_connection() }
    }

    pub fn get(&self, key: &str) -> CoreResult<Option<String>> {
        Ok(self.conn.query_row(SELECT_VALUE, params![key], |row| row.get(0)).optional()?)
    }

    pub fn set(&mut self, key: &str, value: &str) -> CoreResult<()> {
        self.conn.execute(UPSERT_VALUE, params![key, value])?;
        Ok(())
    }

    /// Returns whether the key existed.
    pub fn remove(&mut self, key: &str) -> CoreResult<bool> {
        Ok(self.conn.execute(DELETE_VALUE, params![key])? > 0)
    }
}
