//! Coupon API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};
use shared::models::{Coupon, RedeemedCoupon};

/// GET /api/coupons - 本人优惠券列表
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Coupon>>> {
    let coupons = state.coupons.list_for_owner(&user.id).await?;
    Ok(Json(coupons))
}

#[derive(serde::Deserialize, Validate)]
pub struct IssuePayload {
    #[validate(length(min = 1))]
    pub owner_id: String,
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    pub discount: f64,
    /// percent | amount — 其他值返回 InvalidDiscountType
    pub discount_type: String,
    pub min_amount: Option<i64>,
    #[validate(range(min = 1, max = 365))]
    pub expiry_days: i64,
}

/// POST /api/coupons - 发放优惠券 (仅管理员)
pub async fn issue(
    State(state): State<ServerState>,
    Json(payload): Json<IssuePayload>,
) -> AppResult<Json<Coupon>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let coupon = state
        .coupons
        .issue(
            &payload.owner_id,
            &payload.title,
            payload.discount,
            &payload.discount_type,
            payload.min_amount,
            payload.expiry_days,
        )
        .await?;
    Ok(Json(coupon))
}

/// POST /api/coupons/{id}/redeem - 核销本人优惠券
pub async fn redeem(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<RedeemedCoupon>> {
    let redeemed = state.coupons.redeem(&user.id, id).await?;
    Ok(Json(redeemed))
}
