//! Core library modules for the kitty application.
//!
//! Domain types and pure logic live here; persistence lives in
//! [`crate::db`].
//!
//! ## Features
//!
//! - **Core Infrastructure**: Configuration, data storage, errors, messaging
//! - **Blocks and Runs**: Block aggregates, the run state machine, roulette
//! - **Diary and Calendar**: Mood scale and statistics, calendar types
//! - **User Interface**: Console tables and formatting
//!
//! ## Usage
//!
//! ```rust
//! use kitty::libs::mood::compute_mood_stats;
//!
//! let stats = compute_mood_stats(&[], 7);
//! assert_eq!(stats.count, 0);
//! ```

pub mod block;
pub mod calendar;
pub mod config;
pub mod data_storage;
pub mod error;
pub mod execution;
pub mod formatter;
pub mod messages;
pub mod mood;
pub mod roulette;
pub mod session;
pub mod view;
