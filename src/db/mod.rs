//! Database layer for the kitty application.
//!
//! Every store owns one SQLite connection opened through [`db::Db`], which
//! configures the connection and brings the schema up to date before the
//! store is handed out. Stores can be opened three ways:
//!
//! - `Store::new()` opens the file named in the configuration
//! - `Store::open(path)` opens a specific file
//! - `Store::from_db(db)` reuses an already opened [`db::Db`]
//!
//! ## Usage
//!
//! ```rust,no_run
//! use kitty::db::{diary::Diary, executions::Executions};
//! use chrono::NaiveDate;
//!
//! let mut diary = Diary::open("kitty.db")?;
//! diary.upsert(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(), 4, "Long walk")?;
//!
//! let history = Executions::open("kitty.db")?.list_history(50)?;
//! # Ok::<(), kitty::libs::error::CoreError>(())
//! ```

/// Connection setup and the generic statement entry point.
pub mod db;

/// Versioned schema migrations.
pub mod migrations;

/// Blocks, roulette options and subtasks.
pub mod blocks;

/// Runs of blocks and their completion snapshots.
pub mod executions;

pub mod diary;

/// Diary tags.
pub mod tags;

pub mod calendar;

/// Local accounts and the persisted session.
pub mod users;

pub mod settings;

pub mod repair;
