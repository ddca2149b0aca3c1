//! Payment API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::services::payment_service::PaymentCancelResult;
use crate::services::refund::RefundQuote;
use crate::utils::{AppError, AppResult};
use shared::models::Payment;

#[derive(serde::Deserialize, Validate)]
pub struct ConfirmPayload {
    #[validate(length(min = 1))]
    pub payment_key: String,
    #[validate(length(min = 1, max = 64))]
    pub order_id: String,
    #[validate(range(min = 1))]
    pub amount: i64,
    /// 付费对应的活动时间 (epoch millis)，退款政策以此计算
    pub event_at: i64,
}

/// POST /api/payments/confirm - 网关确认后记录支付
pub async fn confirm(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ConfirmPayload>,
) -> AppResult<Json<Payment>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let payment = state
        .payments
        .confirm(
            &user.id,
            &payload.payment_key,
            &payload.order_id,
            payload.amount,
            payload.event_at,
        )
        .await?;
    Ok(Json(payment))
}

#[derive(serde::Deserialize, Validate)]
pub struct CancelPayload {
    #[validate(length(min = 1, max = 500))]
    pub reason: String,
}

/// POST /api/payments/{order_id}/cancel - 按退款政策取消支付
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(order_id): Path<String>,
    Json(payload): Json<CancelPayload>,
) -> AppResult<Json<PaymentCancelResult>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let result = state
        .payments
        .cancel(&user.id, &order_id, &payload.reason)
        .await?;
    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct RefundQuoteQuery {
    pub amount: i64,
    pub event_at: i64,
}

/// GET /api/payments/refund-quote - 退款金额预览 (纯计算)
pub async fn refund_quote(
    State(state): State<ServerState>,
    Query(query): Query<RefundQuoteQuery>,
) -> AppResult<Json<RefundQuote>> {
    Ok(Json(state.payments.refund_quote(query.amount, query.event_at)))
}
