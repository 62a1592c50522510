//! Block hierarchy store.
//!
//! Owns the `blocks` and `subtasks` tables. A roulette and its options live
//! in the same table, linked by `parent_id`; subtasks hang off whichever
//! block owns them. Every write that touches more than one row runs in a
//! single transaction, so the aggregate is either fully replaced or left as
//! it was.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use kitty::db::blocks::Blocks;
//! use kitty::libs::block::{BlockDraft, BlockItem};
//!
//! let mut blocks = Blocks::open("kitty.db")?;
//! let draft = BlockDraft::roulette("Workout", "", vec![
//!     BlockItem::new("Run").with_minutes(30),
//!     BlockItem::new("Yoga").with_minutes(20).with_subtasks(&["Mat", "Stretch"]),
//! ]);
//! let id = blocks.create(&draft)?;
//! let detail = blocks.get_with_children(id)?;
//! assert_eq!(detail.options.len(), 2);
//! # Ok::<(), kitty::libs::error::CoreError>(())
//! ```

use crate::db::db::{logged_step, Db};
use crate::libs::block::{Block, BlockDetail, BlockDraft, BlockOption, BlockSummary, BlockType, Subtask, OPTION_DESCRIPTION};
use crate::libs::error::{CoreError, CoreResult};
use crate::libs::messages::Message;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use std::path::Path;

const BLOCK_COLUMNS: &str = "id, name, description, type, estimated_minutes, parent_id";
const INSERT_BLOCK: &str = "INSERT INTO blocks (name, description, type, estimated_minutes, parent_id) VALUES (?1, ?2, ?3, ?4, ?5)";
const UPDATE_BLOCK: &str = "UPDATE blocks SET name = ?2, description = ?3, estimated_minutes = ?4 WHERE id = ?1";
const DELETE_BLOCK: &str = "DELETE FROM blocks WHERE id = ?1";
const INSERT_SUBTASK: &str = "INSERT INTO subtasks (block_id, name, position) VALUES (?1, ?2, ?3)";
const SELECT_SUBTASKS: &str = "SELECT id, block_id, name, position FROM subtasks WHERE block_id = ?1 ORDER BY position, id";
const DELETE_OWN_SUBTASKS: &str = "DELETE FROM subtasks WHERE block_id = ?1";
const DELETE_OPTION_SUBTASKS: &str = "DELETE FROM subtasks WHERE block_id IN (SELECT id FROM blocks WHERE parent_id = ?1)";
const DELETE_OPTIONS: &str = "DELETE FROM blocks WHERE parent_id = ?1";
const RELEASE_OPTION_EVENTS: &str =
    "UPDATE calendar_events SET assigned_block_id = NULL WHERE assigned_block_id IN (SELECT id FROM blocks WHERE parent_id = ?1)";
const RELEASE_OWN_EVENTS: &str = "UPDATE calendar_events SET assigned_block_id = NULL WHERE assigned_block_id = ?1";
const SELECT_TOP_LEVEL: &str = "
    SELECT b.id, b.name, b.description, b.type, b.estimated_minutes, b.parent_id,
        CASE b.type
            WHEN 'roulette' THEN (SELECT COUNT(*) FROM blocks c WHERE c.parent_id = b.id)
            ELSE (SELECT COUNT(*) FROM subtasks s WHERE s.block_id = b.id)
        END AS item_count
    FROM blocks b
    WHERE b.parent_id IS NULL
    ORDER BY b.name COLLATE NOCASE, b.id
";

pub struct Blocks {
    conn: Connection,
}

impl Blocks {
    /// Opens the configured store.
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self::from_db(Db::new()?))
    }

    pub fn open(path: impl AsRef<Path>) -> CoreResult<Self> {
        Ok(Self::from_db(Db::open(path)?))
    }

    pub fn from_db(db: Db) -> Self {
        Blocks { conn: db.into_connection() }
    }

    /// Creates a block with its subtasks, or a roulette with its options and
    /// their subtasks. Returns the new block id.
    pub fn create(&mut self, draft: &BlockDraft) -> CoreResult<i64> {
        let draft = draft.normalized()?;

        let tx = self.conn.transaction()?;
        logged_step(
            "insert_block",
            0,
            tx.execute(
                INSERT_BLOCK,
                params![draft.name, draft.description, draft.block_type, draft.estimated_minutes, None::<i64>],
            ),
        )?;
        let id = tx.last_insert_rowid();
        insert_items(&tx, id, &draft)?;
        tx.commit()?;

        tracing::info!(block_id = id, block_type = %draft.block_type, items = draft.items.len(), "block created");
        Ok(id)
    }

    /// Replaces name, description, estimate and the whole item set of a
    /// top-level block. The type never changes.
    ///
    /// Existing subtasks and options are deleted and re-inserted, so ids
    /// handed out before the edit no longer exist afterwards.
    pub fn update(&mut self, id: i64, draft: &BlockDraft) -> CoreResult<()> {
        let draft = draft.normalized()?;
        let existing = self.get(id)?.ok_or_else(|| CoreError::not_found("block", id))?;

        if existing.is_option() {
            return Err(CoreError::validation(Message::OptionEditedDirectly(id)));
        }
        if existing.block_type != draft.block_type {
            return Err(CoreError::validation(Message::BlockTypeImmutable(existing.block_type.to_string())));
        }

        let tx = self.conn.transaction()?;
        logged_step(
            "update_block",
            id,
            tx.execute(UPDATE_BLOCK, params![id, draft.name, draft.description, draft.estimated_minutes]),
        )?;
        delete_children(&tx, id)?;
        insert_items(&tx, id, &draft)?;
        tx.commit()?;

        tracing::info!(block_id = id, items = draft.items.len(), "block replaced");
        Ok(())
    }

    /// Deletes a block and everything it owns, children before parents.
    ///
    /// Calendar events assigned to any removed block lose their assignment.
    pub fn delete(&mut self, id: i64) -> CoreResult<()> {
        if self.get(id)?.is_none() {
            return Err(CoreError::not_found("block", id));
        }

        let tx = self.conn.transaction()?;
        delete_children(&tx, id)?;
        logged_step("release_events", id, tx.execute(RELEASE_OWN_EVENTS, params![id]))?;
        logged_step("delete_block", id, tx.execute(DELETE_BLOCK, params![id]))?;
        tx.commit()?;

        tracing::info!(block_id = id, "block deleted");
        Ok(())
    }

    pub fn get(&self, id: i64) -> CoreResult<Option<Block>> {
        let sql = format!("SELECT {} FROM blocks WHERE id = ?1", BLOCK_COLUMNS);
        let block = self.conn.query_row(&sql, params![id], block_from_row).optional()?;
        Ok(block)
    }

    /// Top-level blocks (roulette options excluded) with their item counts.
    pub fn list_top_level(&self) -> CoreResult<Vec<BlockSummary>> {
        let mut stmt = self.conn.prepare(SELECT_TOP_LEVEL)?;
        let summaries = stmt
            .query_map([], |row| {
                Ok(BlockSummary {
                    block: block_from_row(row)?,
                    item_count: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(summaries)
    }

    /// Options of a roulette in creation order.
    pub fn list_options(&self, roulette_id: i64) -> CoreResult<Vec<Block>> {
        let sql = format!("SELECT {} FROM blocks WHERE parent_id = ?1 ORDER BY id", BLOCK_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let options = stmt.query_map(params![roulette_id], block_from_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(options)
    }

    pub fn list_subtasks(&self, block_id: i64) -> CoreResult<Vec<Subtask>> {
        list_subtasks(&self.conn, block_id)
    }

    /// The block, its own subtasks and, for a roulette, every option with
    /// its subtasks.
    pub fn get_with_children(&self, id: i64) -> CoreResult<BlockDetail> {
        let block = self.get(id)?.ok_or_else(|| CoreError::not_found("block", id))?;
        let subtasks = self.list_subtasks(id)?;

        let mut options = Vec::new();
        if block.block_type == BlockType::Roulette {
            for option in self.list_options(id)? {
                let subtasks = self.list_subtasks(option.id)?;
                options.push(BlockOption { block: option, subtasks });
            }
        }

        Ok(BlockDetail { block, subtasks, options })
    }
}

pub(crate) fn block_from_row(row: &Row) -> rusqlite::Result<Block> {
    Ok(Block {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        block_type: row.get(3)?,
        estimated_minutes: row.get(4)?,
        parent_id: row.get(5)?,
    })
}

pub(crate) fn list_subtasks(conn: &Connection, block_id: i64) -> CoreResult<Vec<Subtask>> {
    let mut stmt = conn.prepare(SELECT_SUBTASKS)?;
    let subtasks = stmt
        .query_map(params![block_id], |row| {
            Ok(Subtask {
                id: row.get(0)?,
                block_id: row.get(1)?,
                name: row.get(2)?,
                position: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(subtasks)
}

/// Inserts the items of a normalized draft under `block_id`.
fn insert_items(tx: &Transaction, block_id: i64, draft: &BlockDraft) -> CoreResult<()> {
    match draft.block_type {
        BlockType::Standard => {
            let names: Vec<&str> = draft.items.iter().map(|item| item.text.as_str()).collect();
            insert_subtasks(tx, block_id, &names)?;
        }
        BlockType::Roulette => {
            for item in &draft.items {
                logged_step(
                    "insert_option",
                    block_id,
                    tx.execute(
                        INSERT_BLOCK,
                        params![item.text, OPTION_DESCRIPTION, BlockType::Standard, item.minutes, block_id],
                    ),
                )?;
                let option_id = tx.last_insert_rowid();
                let names: Vec<&str> = item.subtasks.iter().map(String::as_str).collect();
                insert_subtasks(tx, option_id, &names)?;
            }
        }
    }
    Ok(())
}

fn insert_subtasks(tx: &Transaction, block_id: i64, names: &[&str]) -> CoreResult<()> {
    for (position, name) in names.iter().enumerate() {
        logged_step("insert_subtask", block_id, tx.execute(INSERT_SUBTASK, params![block_id, name, position as u32]))?;
    }
    Ok(())
}

/// Removes everything a block owns, deepest rows first: option subtasks,
/// options, then the block's own subtasks.
fn delete_children(tx: &Transaction, block_id: i64) -> CoreResult<()> {
    logged_step("release_option_events", block_id, tx.execute(RELEASE_OPTION_EVENTS, params![block_id]))?;
    logged_step("delete_option_subtasks", block_id, tx.execute(DELETE_OPTION_SUBTASKS, params![block_id]))?;
    logged_step("delete_options", block_id, tx.execute(DELETE_OPTIONS, params![block_id]))?;
    logged_step("delete_subtasks", block_id, tx.execute(DELETE_OWN_SUBTASKS, params![block_id]))?;
    Ok(())
}
