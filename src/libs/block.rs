//! Block domain types: the aggregate written by the block manager and the
//! read models returned from it.
//!
//! A block is either a **standard** task list that owns ordered subtasks, or
//! a **roulette** whose items are alternative standard blocks (options), each
//! owning its own subtasks. Writes go through a [`BlockDraft`], which is
//! normalized and validated before anything touches the store.

use crate::libs::error::{CoreError, CoreResult};
use crate::libs::messages::Message;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use std::fmt;
use std::str::FromStr;

/// Description given to roulette options that were submitted without one.
pub const OPTION_DESCRIPTION: &str = "Option";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockType {
    Standard,
    Roulette,
}

impl BlockType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Standard => "standard",
            BlockType::Roulette => "roulette",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(BlockType::Standard),
            "roulette" => Ok(BlockType::Roulette),
            other => Err(CoreError::validation(Message::UnknownBlockType(other.to_string()))),
        }
    }
}

impl ToSql for BlockType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for BlockType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str()?.parse().map_err(|e: CoreError| FromSqlError::Other(Box::new(e)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub block_type: BlockType,
    /// Always 0 for roulettes; their time lives on the options.
    pub estimated_minutes: u32,
    /// Set only on roulette options.
    pub parent_id: Option<i64>,
}

impl Block {
    pub fn is_roulette(&self) -> bool {
        self.block_type == BlockType::Roulette
    }

    pub fn is_option(&self) -> bool {
        self.parent_id.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Subtask {
    pub id: i64,
    pub block_id: i64,
    pub name: String,
    pub position: u32,
}

/// One submitted line of a block form.
///
/// For a standard block only `text` is used and becomes a subtask. For a
/// roulette the item becomes an option block with `minutes` as its estimate
/// and `subtasks` as its checklist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockItem {
    pub text: String,
    pub minutes: u32,
    pub subtasks: Vec<String>,
}

impl BlockItem {
    pub fn new(text: &str) -> Self {
        BlockItem {
            text: text.to_string(),
            ..Default::default()
        }
    }

    pub fn with_minutes(mut self, minutes: u32) -> Self {
        self.minutes = minutes;
        self
    }

    pub fn with_subtasks(mut self, subtasks: &[&str]) -> Self {
        self.subtasks = subtasks.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Parses a roulette option written as `name[:minutes[:sub1,sub2]]`.
    ///
    /// ```rust
    /// use kitty::libs::block::BlockItem;
    ///
    /// let item = BlockItem::from_option_spec("Yoga:20:Mat,Stretch")?;
    /// assert_eq!(item.minutes, 20);
    /// assert_eq!(item.subtasks, vec!["Mat", "Stretch"]);
    /// # Ok::<(), kitty::libs::error::CoreError>(())
    /// ```
    pub fn from_option_spec(spec: &str) -> CoreResult<Self> {
        let mut parts = spec.splitn(3, ':');
        let text = parts.next().unwrap_or_default().trim();

        let minutes = match parts.next().map(str::trim) {
            None | Some("") => 0,
            Some(raw) => raw
                .parse::<u32>()
                .map_err(|_| CoreError::validation(Message::InvalidMinutes(raw.to_string())))?,
        };

        let subtasks = parts
            .next()
            .map(|list| list.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        Ok(BlockItem {
            text: text.to_string(),
            minutes,
            subtasks,
        })
    }
}

/// Complete description of a block used for both create and full-replace
/// update.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockDraft {
    pub name: String,
    pub description: String,
    pub block_type: BlockType,
    pub estimated_minutes: u32,
    pub items: Vec<BlockItem>,
}

impl BlockDraft {
    pub fn standard(name: &str, description: &str, estimated_minutes: u32, items: Vec<BlockItem>) -> Self {
        BlockDraft {
            name: name.to_string(),
            description: description.to_string(),
            block_type: BlockType::Standard,
            estimated_minutes,
            items,
        }
    }

    pub fn roulette(name: &str, description: &str, options: Vec<BlockItem>) -> Self {
        BlockDraft {
            name: name.to_string(),
            description: description.to_string(),
            block_type: BlockType::Roulette,
            estimated_minutes: 0,
            items: options,
        }
    }

    /// Trims every name, drops blank items and blank nested subtasks, and
    /// forces a roulette's own estimate to 0.
    ///
    /// Fails when the name is blank or no item survives.
    pub fn normalized(&self) -> CoreResult<BlockDraft> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CoreError::validation(Message::BlockNameRequired));
        }

        let items: Vec<BlockItem> = self
            .items
            .iter()
            .filter(|item| !item.text.trim().is_empty())
            .map(|item| BlockItem {
                text: item.text.trim().to_string(),
                minutes: item.minutes,
                subtasks: item
                    .subtasks
                    .iter()
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            })
            .collect();

        if items.is_empty() {
            return Err(CoreError::validation(Message::BlockItemsRequired));
        }

        let estimated_minutes = match self.block_type {
            BlockType::Roulette => 0,
            BlockType::Standard => self.estimated_minutes,
        };

        Ok(BlockDraft {
            name: name.to_string(),
            description: self.description.trim().to_string(),
            block_type: self.block_type,
            estimated_minutes,
            items,
        })
    }
}

/// Row of the block library: a top-level block and its item count
/// (options for a roulette, subtasks for a standard block).
#[derive(Debug, Clone, PartialEq)]
pub struct BlockSummary {
    pub block: Block,
    pub item_count: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockOption {
    pub block: Block,
    pub subtasks: Vec<Subtask>,
}

/// A block with everything it owns, three levels deep.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockDetail {
    pub block: Block,
    pub subtasks: Vec<Subtask>,
    pub options: Vec<BlockOption>,
}

impl BlockDetail {
    /// Rebuilds the draft that would recreate this block, for edit forms.
    pub fn to_draft(&self) -> BlockDraft {
        let items = match self.block.block_type {
            BlockType::Standard => self.subtasks.iter().map(|s| BlockItem::new(&s.name)).collect(),
            BlockType::Roulette => self
                .options
                .iter()
                .map(|option| BlockItem {
                    text: option.block.name.clone(),
                    minutes: option.block.estimated_minutes,
                    subtasks: option.subtasks.iter().map(|s| s.name.clone()).collect(),
                })
                .collect(),
        };

        BlockDraft {
            name: self.block.name.clone(),
            description: self.block.description.clone(),
            block_type: self.block.block_type,
            estimated_minutes: self.block.estimated_minutes,
            items,
        }
    }
}
