//! Coupon Lifecycle Service
//!
//! Issuance is privileged; redemption flips `is_used` exactly once inside
//! a transaction, so two concurrent redemptions of the same coupon cannot
//! both succeed.

use crate::db::repository::{RepoError, coupon as coupon_repo};
use crate::db::with_txn_retry;
use shared::models::{Coupon, DiscountType, RedeemedCoupon};
use shared::util;
use shared::{AppError, AppResult, ErrorCode};
use sqlx::SqlitePool;

const DAY_MS: i64 = 86_400_000;

#[derive(Clone)]
pub struct CouponService {
    pool: SqlitePool,
}

impl CouponService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Issue a coupon to a user. Authorization (admin role) is enforced at
    /// the route layer; this validates the discount terms.
    pub async fn issue(
        &self,
        owner_id: &str,
        title: &str,
        discount: f64,
        discount_type: &str,
        min_amount: Option<i64>,
        expiry_days: i64,
    ) -> AppResult<Coupon> {
        let discount_type = match discount_type {
            "percent" => DiscountType::Percent,
            "amount" => DiscountType::Amount,
            other => {
                return Err(AppError::with_message(
                    ErrorCode::InvalidDiscountType,
                    format!("unknown discount type: {other}"),
                ));
            }
        };

        if discount <= 0.0 {
            return Err(AppError::validation("discount must be positive"));
        }
        if discount_type == DiscountType::Percent && discount > 100.0 {
            return Err(AppError::validation("percent discount cannot exceed 100"));
        }
        if expiry_days <= 0 {
            return Err(AppError::validation("expiry_days must be positive"));
        }

        let expires_at = util::now_millis() + expiry_days * DAY_MS;
        let coupon = coupon_repo::insert(
            &self.pool,
            coupon_repo::NewCoupon {
                owner_id,
                title,
                discount,
                discount_type,
                min_amount: min_amount.unwrap_or(0),
                expires_at,
            },
        )
        .await?;

        Ok(coupon)
    }

    /// Redeem a coupon, returning its discount terms.
    pub async fn redeem(&self, owner_id: &str, coupon_id: i64) -> AppResult<RedeemedCoupon> {
        let pool = &self.pool;
        with_txn_retry("coupon_redeem", || {
            Self::redeem_txn(pool, owner_id, coupon_id)
        })
        .await
    }

    async fn redeem_txn(
        pool: &SqlitePool,
        owner_id: &str,
        coupon_id: i64,
    ) -> AppResult<RedeemedCoupon> {
        let now = util::now_millis();
        let mut txn = pool.begin().await.map_err(RepoError::from)?;

        let coupon = coupon_repo::find_by_id(&mut *txn, coupon_id)
            .await?
            // Another user's coupon is indistinguishable from a missing one
            .filter(|c| c.owner_id == owner_id)
            .ok_or_else(|| AppError::new(ErrorCode::CouponNotFound))?;

        if coupon.is_used {
            return Err(AppError::new(ErrorCode::CouponAlreadyUsed));
        }
        if coupon.expires_at < now {
            return Err(AppError::new(ErrorCode::CouponExpired));
        }

        let rows = coupon_repo::mark_used(&mut *txn, coupon_id, now).await?;
        if rows == 0 {
            // A concurrent redemption got there between the read and the
            // conditioned flip
            return Err(AppError::new(ErrorCode::CouponAlreadyUsed));
        }

        txn.commit().await.map_err(RepoError::from)?;

        Ok(RedeemedCoupon {
            coupon_id,
            discount: coupon.discount,
            discount_type: coupon.discount_type,
            min_amount: coupon.min_amount,
            used_at: now,
        })
    }

    pub async fn list_for_owner(&self, owner_id: &str) -> AppResult<Vec<Coupon>> {
        let coupons = coupon_repo::list_for_owner(&self.pool, owner_id).await?;
        Ok(coupons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use tempfile::TempDir;

    async fn test_service() -> (CouponService, SqlitePool, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = DbService::new(path.to_str().unwrap()).await.unwrap();
        (CouponService::new(db.pool.clone()), db.pool, dir)
    }

    #[tokio::test]
    async fn test_issue_and_redeem() {
        let (svc, _pool, _dir) = test_service().await;
        let coupon = svc
            .issue("alice", "Launch promo", 10.0, "percent", Some(5_000), 30)
            .await
            .unwrap();
        assert!(!coupon.is_used);
        assert_eq!(coupon.discount_type, DiscountType::Percent);

        let redeemed = svc.redeem("alice", coupon.id).await.unwrap();
        assert_eq!(redeemed.coupon_id, coupon.id);
        assert_eq!(redeemed.discount, 10.0);
        assert_eq!(redeemed.min_amount, 5_000);
    }

    #[tokio::test]
    async fn test_issue_rejects_unknown_discount_type() {
        let (svc, _pool, _dir) = test_service().await;
        let err = svc
            .issue("alice", "Broken", 10.0, "points", None, 30)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidDiscountType);
    }

    #[tokio::test]
    async fn test_issue_validates_terms() {
        let (svc, _pool, _dir) = test_service().await;
        let err = svc
            .issue("alice", "Zero", 0.0, "amount", None, 30)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let err = svc
            .issue("alice", "Overfull", 120.0, "percent", None, 30)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let err = svc
            .issue("alice", "Stale", 10.0, "percent", None, 0)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn test_redeem_twice_fails() {
        let (svc, _pool, _dir) = test_service().await;
        let coupon = svc
            .issue("alice", "Once only", 3_000.0, "amount", None, 7)
            .await
            .unwrap();

        svc.redeem("alice", coupon.id).await.unwrap();
        let err = svc.redeem("alice", coupon.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CouponAlreadyUsed);
    }

    #[tokio::test]
    async fn test_redeem_concurrently_succeeds_at_most_once() {
        let (svc, _pool, _dir) = test_service().await;
        let coupon = svc
            .issue("alice", "Race me", 1_000.0, "amount", None, 7)
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..4 {
            let svc = svc.clone();
            let id = coupon.id;
            handles.push(tokio::spawn(async move { svc.redeem("alice", id).await }));
        }

        let mut ok = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => ok += 1,
                Err(err) => assert_eq!(err.code, ErrorCode::CouponAlreadyUsed),
            }
        }
        assert_eq!(ok, 1);
    }

    #[tokio::test]
    async fn test_redeem_expired_fails() {
        let (svc, pool, _dir) = test_service().await;
        let coupon = svc
            .issue("alice", "Expired", 10.0, "percent", None, 1)
            .await
            .unwrap();

        // Age the coupon past its expiry
        sqlx::query("UPDATE coupon SET expires_at = ? WHERE id = ?")
            .bind(util::now_millis() - 1)
            .bind(coupon.id)
            .execute(&pool)
            .await
            .unwrap();

        let err = svc.redeem("alice", coupon.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CouponExpired);
    }

    #[tokio::test]
    async fn test_redeem_foreign_coupon_reports_not_found() {
        let (svc, _pool, _dir) = test_service().await;
        let coupon = svc
            .issue("alice", "Private", 10.0, "percent", None, 7)
            .await
            .unwrap();

        let err = svc.redeem("bob", coupon.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CouponNotFound);
    }

    #[tokio::test]
    async fn test_list_for_owner() {
        let (svc, _pool, _dir) = test_service().await;
        svc.issue("alice", "A", 10.0, "percent", None, 7).await.unwrap();
        svc.issue("alice", "B", 500.0, "amount", None, 7).await.unwrap();
        svc.issue("bob", "C", 10.0, "percent", None, 7).await.unwrap();

        let mine = svc.list_for_owner("alice").await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|c| c.owner_id == "alice"));
    }
}
