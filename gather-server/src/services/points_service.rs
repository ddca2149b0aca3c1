//! Points Ledger Service
//!
//! Atomic balance adjustment with an append-only history. Every balance
//! move and its ledger entry commit in one transaction, so the running
//! sum of a user's entries always equals the stored balance.

use crate::db::repository::{RepoError, points as points_repo};
use crate::db::with_txn_retry;
use shared::models::{AdjustDirection, AdjustResult, LedgerEntry, LedgerKind, PointsAccount};
use shared::util;
use shared::{AppError, AppResult, ErrorCode};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct PointsService {
    pool: SqlitePool,
}

impl PointsService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Adjust a user's balance and append the matching ledger entry.
    ///
    /// Not idempotent — callers needing exactly-once semantics must guard
    /// with their own dedup key (see the attendance check-in flow).
    pub async fn adjust(
        &self,
        user_id: &str,
        amount: i64,
        direction: AdjustDirection,
        reason: &str,
    ) -> AppResult<AdjustResult> {
        if amount <= 0 {
            return Err(AppError::validation("amount must be positive"));
        }

        let pool = &self.pool;
        with_txn_retry("points_adjust", || {
            Self::adjust_txn(pool, user_id, amount, direction, reason)
        })
        .await
    }

    async fn adjust_txn(
        pool: &SqlitePool,
        user_id: &str,
        amount: i64,
        direction: AdjustDirection,
        reason: &str,
    ) -> AppResult<AdjustResult> {
        let now = util::now_millis();
        let mut txn = pool.begin().await.map_err(RepoError::from)?;

        // Accounts are created lazily with balance 0 on first adjustment
        points_repo::ensure_account(&mut *txn, user_id, now).await?;
        let account = points_repo::find_account(&mut *txn, user_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::AccountNotFound))?;

        let (new_balance, signed_amount, kind) = match direction {
            AdjustDirection::Add => (account.balance + amount, amount, LedgerKind::Earn),
            AdjustDirection::Subtract => {
                if account.balance < amount {
                    return Err(AppError::with_message(
                        ErrorCode::InsufficientBalance,
                        "insufficient balance",
                    ));
                }
                (account.balance - amount, -amount, LedgerKind::Spend)
            }
        };

        points_repo::update_balance(&mut *txn, user_id, new_balance, now).await?;

        let entry_id = util::snowflake_id();
        points_repo::insert_ledger_entry(
            &mut *txn,
            points_repo::NewLedgerEntry {
                id: entry_id,
                user_id,
                amount: signed_amount,
                kind,
                reason,
                balance_before: account.balance,
                balance_after: new_balance,
                created_at: now,
            },
        )
        .await?;

        txn.commit().await.map_err(RepoError::from)?;

        Ok(AdjustResult {
            new_balance,
            ledger_entry_id: entry_id,
        })
    }

    pub async fn balance(&self, user_id: &str) -> AppResult<PointsAccount> {
        points_repo::find_account(&self.pool, user_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::AccountNotFound))
    }

    pub async fn history(&self, user_id: &str, limit: i64) -> AppResult<Vec<LedgerEntry>> {
        let entries =
            points_repo::list_ledger_entries(&self.pool, user_id, limit.clamp(1, 200)).await?;
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use tempfile::TempDir;

    async fn test_service() -> (PointsService, SqlitePool, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = DbService::new(path.to_str().unwrap()).await.unwrap();
        (PointsService::new(db.pool.clone()), db.pool, dir)
    }

    #[tokio::test]
    async fn test_add_creates_account_lazily() {
        let (svc, _pool, _dir) = test_service().await;
        let res = svc
            .adjust("u1", 100, AdjustDirection::Add, "welcome bonus")
            .await
            .unwrap();
        assert_eq!(res.new_balance, 100);

        let account = svc.balance("u1").await.unwrap();
        assert_eq!(account.balance, 100);
    }

    #[tokio::test]
    async fn test_subtract_ok() {
        let (svc, _pool, _dir) = test_service().await;
        svc.adjust("u1", 300, AdjustDirection::Add, "earn").await.unwrap();
        let res = svc
            .adjust("u1", 120, AdjustDirection::Subtract, "spend")
            .await
            .unwrap();
        assert_eq!(res.new_balance, 180);
    }

    #[tokio::test]
    async fn test_subtract_insufficient_balance_leaves_state_unchanged() {
        let (svc, pool, _dir) = test_service().await;
        svc.adjust("u1", 50, AdjustDirection::Add, "earn").await.unwrap();

        let err = svc
            .adjust("u1", 100, AdjustDirection::Subtract, "spend")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientBalance);

        let account = svc.balance("u1").await.unwrap();
        assert_eq!(account.balance, 50);
        // No ledger entry was appended for the failed adjustment
        let entries = points_repo::list_ledger_entries(&pool, "u1", 10).await.unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_amount_must_be_positive() {
        let (svc, _pool, _dir) = test_service().await;
        let err = svc.adjust("u1", 0, AdjustDirection::Add, "noop").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let err = svc
            .adjust("u1", -5, AdjustDirection::Subtract, "noop")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn test_ledger_sum_equals_balance() {
        let (svc, pool, _dir) = test_service().await;
        svc.adjust("u1", 500, AdjustDirection::Add, "a").await.unwrap();
        svc.adjust("u1", 120, AdjustDirection::Subtract, "b").await.unwrap();
        svc.adjust("u1", 30, AdjustDirection::Add, "c").await.unwrap();
        svc.adjust("u1", 7, AdjustDirection::Subtract, "d").await.unwrap();

        let account = svc.balance("u1").await.unwrap();
        let sum = points_repo::sum_ledger_amounts(&pool, "u1").await.unwrap();
        assert_eq!(account.balance, 403);
        assert_eq!(sum, account.balance);
    }

    #[tokio::test]
    async fn test_ledger_entries_carry_balance_snapshots() {
        let (svc, _pool, _dir) = test_service().await;
        svc.adjust("u1", 200, AdjustDirection::Add, "a").await.unwrap();
        svc.adjust("u1", 80, AdjustDirection::Subtract, "b").await.unwrap();

        let entries = svc.history("u1", 10).await.unwrap();
        assert_eq!(entries.len(), 2);
        // Newest first
        assert_eq!(entries[0].kind, LedgerKind::Spend);
        assert_eq!(entries[0].amount, -80);
        assert_eq!(entries[0].balance_before, 200);
        assert_eq!(entries[0].balance_after, 120);
        assert_eq!(entries[1].kind, LedgerKind::Earn);
        assert_eq!(entries[1].amount, 200);
        assert_eq!(entries[1].balance_before, 0);
    }

    #[tokio::test]
    async fn test_balance_unknown_user_not_found() {
        let (svc, _pool, _dir) = test_service().await;
        let err = svc.balance("ghost").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AccountNotFound);
    }

    #[tokio::test]
    async fn test_concurrent_adjustments_lose_no_updates() {
        let (svc, pool, _dir) = test_service().await;

        let mut handles = Vec::new();
        for _ in 0..10 {
            let svc = svc.clone();
            handles.push(tokio::spawn(async move {
                svc.adjust("u1", 10, AdjustDirection::Add, "tick").await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let account = svc.balance("u1").await.unwrap();
        assert_eq!(account.balance, 100);
        let sum = points_repo::sum_ledger_amounts(&pool, "u1").await.unwrap();
        assert_eq!(sum, 100);
    }
}
