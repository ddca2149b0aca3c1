//! Points Account & Ledger Repository

use super::RepoResult;
use shared::models::{LedgerEntry, LedgerKind, PointsAccount};
use sqlx::{SqliteExecutor, SqlitePool};

pub async fn find_account(
    ex: impl SqliteExecutor<'_>,
    user_id: &str,
) -> RepoResult<Option<PointsAccount>> {
    let row = sqlx::query_as::<_, PointsAccount>(
        "SELECT user_id, balance, created_at, updated_at FROM points_account WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

/// Lazily create the account with balance 0; a no-op when it exists
pub async fn ensure_account(
    ex: impl SqliteExecutor<'_>,
    user_id: &str,
    now: i64,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT OR IGNORE INTO points_account (user_id, balance, created_at, updated_at) VALUES (?1, 0, ?2, ?2)",
    )
    .bind(user_id)
    .bind(now)
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn update_balance(
    ex: impl SqliteExecutor<'_>,
    user_id: &str,
    balance: i64,
    now: i64,
) -> RepoResult<()> {
    sqlx::query("UPDATE points_account SET balance = ?1, updated_at = ?2 WHERE user_id = ?3")
        .bind(balance)
        .bind(now)
        .bind(user_id)
        .execute(ex)
        .await?;
    Ok(())
}

/// Ledger entry parameters — balance snapshots are taken inside the same
/// transaction that moved the balance
pub struct NewLedgerEntry<'a> {
    pub id: i64,
    pub user_id: &'a str,
    pub amount: i64,
    pub kind: LedgerKind,
    pub reason: &'a str,
    pub balance_before: i64,
    pub balance_after: i64,
    pub created_at: i64,
}

pub async fn insert_ledger_entry(
    ex: impl SqliteExecutor<'_>,
    entry: NewLedgerEntry<'_>,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO ledger_entry (id, user_id, amount, kind, reason, balance_before, balance_after, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )
    .bind(entry.id)
    .bind(entry.user_id)
    .bind(entry.amount)
    .bind(entry.kind)
    .bind(entry.reason)
    .bind(entry.balance_before)
    .bind(entry.balance_after)
    .bind(entry.created_at)
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn list_ledger_entries(
    pool: &SqlitePool,
    user_id: &str,
    limit: i64,
) -> RepoResult<Vec<LedgerEntry>> {
    let rows = sqlx::query_as::<_, LedgerEntry>(
        "SELECT id, user_id, amount, kind, reason, balance_before, balance_after, created_at FROM ledger_entry WHERE user_id = ? ORDER BY created_at DESC, id DESC LIMIT ?",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Running sum of all ledger amounts for a user — equals the account
/// balance at every observation point
pub async fn sum_ledger_amounts(pool: &SqlitePool, user_id: &str) -> RepoResult<i64> {
    let sum = sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(amount), 0) FROM ledger_entry WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(sum)
}
