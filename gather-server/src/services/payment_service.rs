//! Payment Service
//!
//! The gateway is consulted before any local mutation and treated as
//! authoritative: a confirm/cancel failure aborts the operation with the
//! gateway error and nothing written.

use crate::db::repository::{RepoError, payment as payment_repo};
use crate::services::gateway::PaymentGateway;
use crate::services::refund::{RefundQuote, calculate_refund};
use shared::models::{Payment, PaymentStatus};
use shared::util;
use shared::{AppError, AppResult, ErrorCode};
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct PaymentService {
    pool: SqlitePool,
    gateway: Arc<dyn PaymentGateway>,
}

/// Outcome of a policy-priced cancellation
#[derive(Debug, Clone, serde::Serialize)]
pub struct PaymentCancelResult {
    pub order_id: String,
    pub refund_amount: i64,
    pub refund_rate: u32,
    pub cancelled_at: i64,
}

impl PaymentService {
    pub fn new(pool: SqlitePool, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { pool, gateway }
    }

    /// Confirm a payment with the gateway, then record it.
    pub async fn confirm(
        &self,
        user_id: &str,
        payment_key: &str,
        order_id: &str,
        amount: i64,
        event_at: i64,
    ) -> AppResult<Payment> {
        if amount <= 0 {
            return Err(AppError::validation("amount must be positive"));
        }
        if payment_repo::find_by_order(&self.pool, order_id).await?.is_some() {
            return Err(AppError::new(ErrorCode::DuplicateOrder));
        }

        // Gateway first; its failure aborts the whole operation
        let confirmation = self.gateway.confirm(payment_key, order_id, amount).await?;

        let payment = match payment_repo::insert(
            &self.pool,
            payment_repo::NewPayment {
                order_id,
                payment_key,
                user_id,
                amount,
                event_at,
                method: confirmation.method.as_deref(),
                approved_at: confirmation.approved_at,
            },
        )
        .await
        {
            Err(RepoError::Duplicate(_)) => {
                return Err(AppError::new(ErrorCode::DuplicateOrder));
            }
            other => other?,
        };

        Ok(payment)
    }

    /// Cancel a confirmed payment, refunding per the policy schedule.
    pub async fn cancel(
        &self,
        user_id: &str,
        order_id: &str,
        reason: &str,
    ) -> AppResult<PaymentCancelResult> {
        let payment = payment_repo::find_by_order(&self.pool, order_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::PaymentNotFound))?;
        if payment.user_id != user_id {
            return Err(AppError::permission_denied("not the payer of this order"));
        }
        if payment.status != PaymentStatus::Confirmed {
            return Err(AppError::new(ErrorCode::PaymentAlreadyCancelled));
        }

        let now = util::now_millis();
        let quote = calculate_refund(payment.amount, payment.event_at, now);

        // Only call out when there is money to move; a zero refund is
        // still a valid local cancellation
        if quote.refund_amount > 0 {
            self.gateway
                .cancel(&payment.payment_key, reason, Some(quote.refund_amount))
                .await?;
        }

        let rows =
            payment_repo::cancel_if_confirmed(&self.pool, order_id, quote.refund_amount, now)
                .await?;
        if rows == 0 {
            return Err(AppError::new(ErrorCode::PaymentAlreadyCancelled));
        }

        Ok(PaymentCancelResult {
            order_id: order_id.to_string(),
            refund_amount: quote.refund_amount,
            refund_rate: quote.refund_rate,
            cancelled_at: now,
        })
    }

    /// Pure refund preview for the caller's UI
    pub fn refund_quote(&self, amount: i64, event_at: i64) -> RefundQuote {
        calculate_refund(amount, event_at, util::now_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::services::gateway::{GatewayCancellation, GatewayConfirmation};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::TempDir;

    const DAY_MS: i64 = 86_400_000;

    /// Test double recording gateway calls
    struct FakeGateway {
        fail_confirm: bool,
        fail_cancel: bool,
        cancels: Mutex<Vec<(String, Option<i64>)>>,
    }

    impl FakeGateway {
        fn ok() -> Self {
            Self {
                fail_confirm: false,
                fail_cancel: false,
                cancels: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PaymentGateway for FakeGateway {
        async fn confirm(
            &self,
            _payment_key: &str,
            _order_id: &str,
            _amount: i64,
        ) -> AppResult<GatewayConfirmation> {
            if self.fail_confirm {
                return Err(AppError::new(ErrorCode::GatewayRejected));
            }
            Ok(GatewayConfirmation {
                method: Some("card".to_string()),
                approved_at: Some(util::now_millis()),
            })
        }

        async fn cancel(
            &self,
            payment_key: &str,
            _reason: &str,
            amount: Option<i64>,
        ) -> AppResult<GatewayCancellation> {
            if self.fail_cancel {
                return Err(AppError::new(ErrorCode::GatewayRejected));
            }
            self.cancels
                .lock()
                .unwrap()
                .push((payment_key.to_string(), amount));
            Ok(GatewayCancellation {
                cancelled_at: Some(util::now_millis()),
            })
        }
    }

    async fn test_service(gateway: FakeGateway) -> (PaymentService, Arc<FakeGateway>, SqlitePool, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = DbService::new(path.to_str().unwrap()).await.unwrap();
        let gateway = Arc::new(gateway);
        let svc = PaymentService::new(db.pool.clone(), gateway.clone());
        (svc, gateway, db.pool, dir)
    }

    #[tokio::test]
    async fn test_confirm_records_payment() {
        let (svc, _gw, _pool, _dir) = test_service(FakeGateway::ok()).await;
        let event_at = util::now_millis() + 3 * DAY_MS;

        let payment = svc
            .confirm("alice", "pay_key_1", "order-1", 100_000, event_at)
            .await
            .unwrap();
        assert_eq!(payment.status, PaymentStatus::Confirmed);
        assert_eq!(payment.amount, 100_000);
        assert_eq!(payment.method.as_deref(), Some("card"));
    }

    #[tokio::test]
    async fn test_confirm_gateway_failure_writes_nothing() {
        let gw = FakeGateway {
            fail_confirm: true,
            ..FakeGateway::ok()
        };
        let (svc, _gw, pool, _dir) = test_service(gw).await;

        let err = svc
            .confirm("alice", "pay_key_1", "order-1", 100_000, util::now_millis())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::GatewayRejected);

        let payment = payment_repo::find_by_order(&pool, "order-1").await.unwrap();
        assert!(payment.is_none());
    }

    #[tokio::test]
    async fn test_confirm_duplicate_order_rejected() {
        let (svc, _gw, _pool, _dir) = test_service(FakeGateway::ok()).await;
        let event_at = util::now_millis() + DAY_MS;

        svc.confirm("alice", "key", "order-1", 10_000, event_at).await.unwrap();
        let err = svc
            .confirm("alice", "key2", "order-1", 10_000, event_at)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateOrder);
    }

    #[tokio::test]
    async fn test_cancel_full_refund_two_days_out() {
        let (svc, gw, _pool, _dir) = test_service(FakeGateway::ok()).await;
        let event_at = util::now_millis() + 3 * DAY_MS;
        svc.confirm("alice", "key", "order-1", 100_000, event_at).await.unwrap();

        let res = svc.cancel("alice", "order-1", "change of plans").await.unwrap();
        assert_eq!(res.refund_rate, 100);
        assert_eq!(res.refund_amount, 100_000);

        let cancels = gw.cancels.lock().unwrap();
        assert_eq!(*cancels, vec![("key".to_string(), Some(100_000))]);
    }

    #[tokio::test]
    async fn test_cancel_day_of_event_refunds_nothing_and_skips_gateway() {
        let (svc, gw, pool, _dir) = test_service(FakeGateway::ok()).await;
        let event_at = util::now_millis();
        svc.confirm("alice", "key", "order-1", 100_000, event_at).await.unwrap();

        let res = svc.cancel("alice", "order-1", "too late").await.unwrap();
        assert_eq!(res.refund_rate, 0);
        assert_eq!(res.refund_amount, 0);
        assert!(gw.cancels.lock().unwrap().is_empty());

        let payment = payment_repo::find_by_order(&pool, "order-1").await.unwrap().unwrap();
        assert_eq!(payment.status, PaymentStatus::Cancelled);
        assert_eq!(payment.refund_amount, Some(0));
    }

    #[tokio::test]
    async fn test_cancel_twice_fails() {
        let (svc, _gw, _pool, _dir) = test_service(FakeGateway::ok()).await;
        let event_at = util::now_millis() + 3 * DAY_MS;
        svc.confirm("alice", "key", "order-1", 50_000, event_at).await.unwrap();

        svc.cancel("alice", "order-1", "first").await.unwrap();
        let err = svc.cancel("alice", "order-1", "second").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentAlreadyCancelled);
    }

    #[tokio::test]
    async fn test_cancel_gateway_failure_keeps_payment_confirmed() {
        let gw = FakeGateway {
            fail_cancel: true,
            ..FakeGateway::ok()
        };
        let (svc, _gw, pool, _dir) = test_service(gw).await;
        let event_at = util::now_millis() + 3 * DAY_MS;
        svc.confirm("alice", "key", "order-1", 50_000, event_at).await.unwrap();

        let err = svc.cancel("alice", "order-1", "nope").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::GatewayRejected);

        let payment = payment_repo::find_by_order(&pool, "order-1").await.unwrap().unwrap();
        assert_eq!(payment.status, PaymentStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_cancel_requires_payer() {
        let (svc, _gw, _pool, _dir) = test_service(FakeGateway::ok()).await;
        let event_at = util::now_millis() + 3 * DAY_MS;
        svc.confirm("alice", "key", "order-1", 50_000, event_at).await.unwrap();

        let err = svc.cancel("bob", "order-1", "mine now").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
    }
}
