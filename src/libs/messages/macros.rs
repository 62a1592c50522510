//! Macros for user-facing output and logging.
//!
//! Every macro routes its message either to the `tracing` system or to plain
//! console output. Debug mode (`KITTY_DEBUG` or `RUST_LOG` set) selects
//! tracing, so a session with logging enabled interleaves user messages with
//! the store's structured events instead of printing them twice.
//!
//! ## Macro Categories
//!
//! - **`msg_print!`**: General message display
//! - **`msg_success!`**: Success notifications with ✅ prefix
//! - **`msg_info!`**: Informational messages with ℹ️ prefix
//! - **`msg_warning!`**: Warning messages with ⚠️ prefix
//! - **`msg_error!`**: Error messages with ❌ prefix, written to stderr
//! - **`msg_debug!`**: Debug-only messages with 🔍 prefix
//! - **`msg_error_anyhow!`** / **`msg_bail_anyhow!`**: Build or return an
//!   `anyhow::Error` from a message
//!
//! ## Usage Examples
//!
//! ```rust
//! use kitty::{msg_info, msg_success, msg_error};
//! use kitty::libs::messages::Message;
//!
//! msg_success!(Message::BlockCreated("Morning".to_string()));
//! msg_info!(Message::NoBlocksFound, true);
//! msg_error!(Message::OperationCancelled);
//! ```

use std::sync::OnceLock;

/// Cached result of the debug mode lookup.
static DEBUG_MODE: OnceLock<bool> = OnceLock::new();

/// Returns `true` when `KITTY_DEBUG` or `RUST_LOG` is set.
///
/// The environment is inspected once per process.
#[doc(hidden)]
pub fn is_debug_mode() -> bool {
    *DEBUG_MODE.get_or_init(|| std::env::var("KITTY_DEBUG").is_ok() || std::env::var("RUST_LOG").is_ok())
}

/// Prints a message, optionally surrounded by blank lines (`msg_print!(msg, true)`).
#[macro_export]
macro_rules! msg_print {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("{}", $msg);
        } else {
            println!("{}", $msg);
        }
    };
    ($msg:expr, true) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("\n{}\n", $msg);
        } else {
            println!("\n{}\n", $msg);
        }
    };
}

#[macro_export]
macro_rules! msg_success {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("✅ {}", $msg);
        } else {
            println!("✅ {}", $msg);
        }
    };
    ($msg:expr, true) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("\n✅ {}\n", $msg);
        } else {
            println!("\n✅ {}\n", $msg);
        }
    };
}

#[macro_export]
macro_rules! msg_error {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::error!("❌ {}", $msg);
        } else {
            eprintln!("❌ {}", $msg);
        }
    };
    ($msg:expr, true) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::error!("\n❌ {}\n", $msg);
        } else {
            eprintln!("\n❌ {}\n", $msg);
        }
    };
}

#[macro_export]
macro_rules! msg_warning {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::warn!("⚠️ {}", $msg);
        } else {
            println!("⚠️ {}", $msg);
        }
    };
    ($msg:expr, true) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::warn!("\n⚠️ {}\n", $msg);
        } else {
            println!("\n⚠️ {}\n", $msg);
        }
    };
}

#[macro_export]
macro_rules! msg_info {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("ℹ️ {}", $msg);
        } else {
            println!("ℹ️ {}", $msg);
        }
    };
    ($msg:expr, true) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("\nℹ️ {}\n", $msg);
        } else {
            println!("\nℹ️ {}\n", $msg);
        }
    };
}

/// Emits only in debug mode.
#[macro_export]
macro_rules! msg_debug {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::debug!("🔍 {}", $msg);
        }
    };
}

#[macro_export]
macro_rules! msg_error_anyhow {
    ($msg:expr) => {
        anyhow::anyhow!("❌ {}", $msg)
    };
}

#[macro_export]
macro_rules! msg_bail_anyhow {
    ($msg:expr) => {
        anyhow::bail!("❌ {}", $msg)
    };
}
