//! Repository Module
//!
//! Plain async query functions over the SQLite pool. Functions that
//! participate in a transaction accept any `SqliteExecutor`, so services
//! can pass either the pool or an open transaction.

pub mod attendance;
pub mod booking;
pub mod coupon;
pub mod payment;
pub mod points;

use shared::{AppError, ErrorCode};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Write conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) => {
                if db.is_unique_violation() {
                    RepoError::Duplicate(db.message().to_string())
                } else if db.message().contains("locked") {
                    // SQLITE_BUSY / SQLITE_BUSY_SNAPSHOT: a concurrent writer
                    // won; the whole transaction body must be re-run
                    RepoError::Conflict(db.message().to_string())
                } else {
                    RepoError::Database(err.to_string())
                }
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Conflict(msg) => AppError::with_message(ErrorCode::WriteConflict, msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
