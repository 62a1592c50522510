//! # Kitty - routine blocks, roulette runs, diary and calendar
//!
//! A command-line routine tracker backed by a local SQLite store.
//!
//! ## Features
//!
//! - **Blocks**: Reusable task lists with ordered subtasks
//! - **Roulettes**: Blocks whose options are picked at random before a run
//! - **Runs**: Timed executions with per-subtask completion snapshots
//! - **Diary**: One mood entry per day, tags and weekly mood statistics
//! - **Calendar**: Events, tasks and holidays merged into a day agenda
//! - **Accounts**: Local sign-up, login and a persisted session
//!
//! ## Usage
//!
//! ```rust,no_run
//! use kitty::db::blocks::Blocks;
//! use kitty::libs::block::{BlockDraft, BlockItem};
//!
//! let mut blocks = Blocks::open("kitty.db")?;
//! let draft = BlockDraft::standard("Morning", "", 15, vec![BlockItem::new("Wash"), BlockItem::new("Dress")]);
//! let id = blocks.create(&draft)?;
//! # Ok::<(), kitty::libs::error::CoreError>(())
//! ```

pub mod commands;
pub mod db;
pub mod libs;
