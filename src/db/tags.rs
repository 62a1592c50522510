use crate::db::db::{logged_step, Db};
use crate::db::diary::{entry_from_row, DiaryEntry};
use crate::libs::error::{CoreError, CoreResult};
use crate::libs::formatter::format_date;
use crate::libs::messages::Message;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

const SELECT_ENTRY_ID: &str = "SELECT id FROM diary_entries WHERE date = ?1";
const INSERT_TAG: &str = "INSERT OR IGNORE INTO tags (name) VALUES (?1)";
const SELECT_TAG_ID: &str = "SELECT id FROM tags WHERE name = ?1";
const INSERT_ENTRY_TAG: &str = "INSERT OR IGNORE INTO diary_entry_tags (entry_id, tag_id) VALUES (?1, ?2)";
const DELETE_ENTRY_TAG: &str = "
    DELETE FROM diary_entry_tags
    WHERE entry_id = ?1 AND tag_id = (SELECT id FROM tags WHERE name = ?2)
";
const SELECT_ALL_TAGS: &str = "
    SELECT t.id, t.name, COUNT(et.entry_id)
    FROM tags t
    LEFT JOIN diary_entry_tags et ON et.tag_id = t.id
    GROUP BY t.id
    ORDER BY t.name
";
const SELECT_TAGS_BY_ENTRY: &str = "
    SELECT t.id, t.name, 1
    FROM tags t
    JOIN diary_entry_tags et ON et.tag_id = t.id
    WHERE et.entry_id = ?1
    ORDER BY t.name
";
const SELECT_ENTRIES_BY_TAG: &str = "
    SELECT e.id, e.date, e.mood, e.notes
    FROM diary_entries e
    JOIN diary_entry_tags et ON et.entry_id = e.id
    JOIN tags t ON t.id = et.tag_id
    WHERE t.name = ?1
    ORDER BY e.date DESC
";

#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    /// Number of diary entries carrying the tag.
    pub usage: u32,
}

pub struct Tags {
    conn: Connection,
}

impl Tags {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self::from_db(Db::new()?))
    }

    pub fn open(path: impl AsRef<Path>) -> CoreResult<Self> {
        Ok(Self::from_db(Db::open(path)?))
    }

    pub fn from_db(db: Db) -> Self {
        Tags { conn: db.into_connection() }
    }

    /// Attaches `tag` to the entry of `date`, creating the tag on first use.
    /// Tagging twice is a no-op.
    pub fn tag_entry(&mut self, date: NaiveDate, tag: &str) -> CoreResult<()> {
        let name = normalize_tag(tag)?;
        let entry_id = self.entry_id(date)?;

        let tx = self.conn.transaction()?;
        logged_step("insert_tag", entry_id, tx.execute(INSERT_TAG, params![name]))?;
        let tag_id: i64 = logged_step("select_tag", entry_id, tx.query_row(SELECT_TAG_ID, params![name], |row| row.get(0)))?;
        logged_step("link_tag", entry_id, tx.execute(INSERT_ENTRY_TAG, params![entry_id, tag_id]))?;
        tx.commit()?;

        tracing::debug!(entry_id, tag = %name, "diary entry tagged");
        Ok(())
    }

    /// Returns whether a link was removed.
    pub fn untag_entry(&mut self, date: NaiveDate, tag: &str) -> CoreResult<bool> {
        let name = normalize_tag(tag)?;
        let entry_id = self.entry_id(date)?;
        let removed = self.conn.execute(DELETE_ENTRY_TAG, params![entry_id, name])?;
        Ok(removed > 0)
    }

    pub fn tags_for_entry(&self, date: NaiveDate) -> CoreResult<Vec<Tag>> {
        let entry_id = self.entry_id(date)?;
        self.query_tags(SELECT_TAGS_BY_ENTRY, params![entry_id])
    }

    /// Entries carrying `tag`, newest first.
    pub fn entries_with_tag(&self, tag: &str) -> CoreResult<Vec<DiaryEntry>> {
        let name = normalize_tag(tag)?;
        let mut stmt = self.conn.prepare(SELECT_ENTRIES_BY_TAG)?;
        let entries = stmt.query_map(params![name], entry_from_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn list_tags(&self) -> CoreResult<Vec<Tag>> {
        self.query_tags(SELECT_ALL_TAGS, [])
    }

    fn query_tags<P: rusqlite::Params>(&self, sql: &str, params: P) -> CoreResult<Vec<Tag>> {
        let mut stmt = self.conn.prepare(sql)?;
        let tags = stmt
            .query_map(params, |row| {
                Ok(Tag {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    usage: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tags)
    }

    fn entry_id(&self, date: NaiveDate) -> CoreResult<i64> {
        self.conn
            .query_row(SELECT_ENTRY_ID, params![format_date(&date)], |row| row.get(0))
            .optional()?
            .ok_or_else(|| CoreError::not_found("diary entry", date))
    }
}

/// Tags are trimmed and lowercased so `Work` and `work ` are one tag.
fn normalize_tag(tag: &str) -> CoreResult<String> {
    let name = tag.trim().to_lowercase();
    if name.is_empty() {
        return Err(CoreError::validation(Message::TagNameRequired));
    }
    Ok(name)
}
