//! Repository Module
//!
//! Module-level CRUD functions over `&SqlitePool`, one file per table.

pub mod order;
pub mod product;
pub mod user;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        // Unique-index violations get their own variant so callers can
        // react (token allocation retries on them); the violated column
        // is recoverable from the SQLite message text.
        if let Some(db_err) = err.as_database_error()
            && db_err.is_unique_violation()
        {
            return RepoError::Duplicate(db_err.message().to_string());
        }
        RepoError::Database(err.to_string())
    }
}

impl RepoError {
    /// True when this is a unique violation on the given column
    /// (message form: `UNIQUE constraint failed: table.column`)
    pub fn is_duplicate_of(&self, column: &str) -> bool {
        matches!(self, RepoError::Duplicate(msg) if msg.contains(column))
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
