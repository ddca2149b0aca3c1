//! Database Module
//!
//! Handles SQLite connection pool, migrations and the transaction retry
//! primitive used by every read-then-write operation.

pub mod repository;

use crate::utils::AppError;
use shared::ErrorCode;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

/// How many times a conflicting transaction body is re-run before the
/// conflict is surfaced to the caller.
pub const MAX_TXN_ATTEMPTS: u32 = 5;

/// Database service — owns a SQLite connection pool
#[derive(Clone)]
pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    /// Create a new database service with WAL mode and a per-connection
    /// busy timeout, then apply migrations.
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| AppError::database(format!("Invalid database path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_millis(5000))
            .pragma("foreign_keys", "ON");

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        tracing::info!("Database connection established (SQLite WAL, busy_timeout=5000ms)");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply migrations: {e}")))?;
        tracing::info!("Database migrations applied");

        Ok(Self { pool })
    }
}

/// Run a transaction body, retrying when it loses a write conflict.
///
/// The body must be restartable: it begins its own transaction, and a
/// failed attempt leaves no state behind (the dropped transaction rolls
/// back). Conflicts are signalled as [`ErrorCode::WriteConflict`] by the
/// repository layer; after [`MAX_TXN_ATTEMPTS`] the conflict error is
/// surfaced to the caller as-is.
pub async fn with_txn_retry<T, F, Fut>(op_name: &'static str, mut op: F) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op().await {
            Err(err) if err.code == ErrorCode::WriteConflict && attempt < MAX_TXN_ATTEMPTS => {
                tracing::debug!(op = op_name, attempt, "write conflict, retrying transaction");
            }
            other => return other,
        }
    }
}
