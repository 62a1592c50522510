//! Error taxonomy of the storage core.
//!
//! Store operations return [`CoreResult`]. Command handlers wrap these in
//! `anyhow` the same way they wrap every other failure.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Bad input, reported before anything is written.
    #[error("{0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("roulette has no options to spin")]
    EmptyRoulette,

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
}

pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn validation(message: impl ToString) -> Self {
        CoreError::Validation(message.to_string())
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        CoreError::NotFound { entity, id: id.to_string() }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, CoreError::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound { .. })
    }
}
