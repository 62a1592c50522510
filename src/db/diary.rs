use crate::db::db::Db;
use crate::libs::error::{CoreError, CoreResult};
use crate::libs::formatter::format_date;
use crate::libs::mood::validate_mood;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const UPSERT_ENTRY: &str = "
    INSERT INTO diary_entries (date, mood, notes) VALUES (?1, ?2, ?3)
    ON CONFLICT(date) DO UPDATE SET mood = excluded.mood, notes = excluded.notes
    RETURNING id
";
const SELECT_ENTRIES: &str = "SELECT id, date, mood, notes FROM diary_entries ORDER BY date DESC";
const SELECT_ENTRY: &str = "SELECT id, date, mood, notes FROM diary_entries WHERE date = ?1";
const DELETE_ENTRY: &str = "DELETE FROM diary_entries WHERE date = ?1";

#[derive(Debug, Clone, PartialEq)]
pub struct DiaryEntry {
    pub id: i64,
    pub date: NaiveDate,
    pub mood: u8,
    pub notes: String,
}

pub struct Diary {
    conn: Connection,
}

impl Diary {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self::from_db(Db::new()?))
    }

    pub fn open(path: impl AsRef<Path>) -> CoreResult<Self> {
        Ok(Self::from_db(Db::open(path)?))
    }

    pub fn from_db(db: Db) -> Self {
        Diary { conn: db.into_connection() }
    }

    /// Writes the entry for `date`, replacing mood and notes if one exists.
    /// Returns the entry id, which stays the same across rewrites.
    pub fn upsert(&mut self, date: NaiveDate, mood: u8, notes: &str) -> CoreResult<i64> {
        let mood = validate_mood(mood)?;
        let id: i64 = self
            .conn
            .query_row(UPSERT_ENTRY, params![format_date(&date), mood, notes.trim()], |row| row.get(0))?;

        tracing::info!(entry_id = id, %date, mood, "diary entry saved");
        Ok(id)
    }

    /// Newest date first.
    pub fn list(&self) -> CoreResult<Vec<DiaryEntry>> {
        let mut stmt = self.conn.prepare(SELECT_ENTRIES)?;
        let entries = stmt.query_map([], entry_from_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn get(&self, date: NaiveDate) -> CoreResult<Option<DiaryEntry>> {
        let entry = self
            .conn
            .query_row(SELECT_ENTRY, params![format_date(&date)], entry_from_row)
            .optional()?;
        Ok(entry)
    }

    /// Deletes the entry and its tag links.
    pub fn delete(&mut self, date: NaiveDate) -> CoreResult<()> {
        let removed = self.conn.execute(DELETE_ENTRY, params![format_date(&date)])?;
        if removed == 0 {
            return Err(CoreError::not_found("diary entry", date));
        }
        Ok(())
    }
}

pub(crate) fn entry_from_row(row: &Row) -> rusqlite::Result<DiaryEntry> {
    Ok(DiaryEntry {
        id: row.get(0)?,
        date: row.get(1)?,
        mood: row.get(2)?,
        notes: row.get(3)?,
    })
}
