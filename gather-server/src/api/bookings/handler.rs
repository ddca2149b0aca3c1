//! Booking API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::services::booking_service::BookingDetail;
use crate::utils::{AppError, AppResult};
use shared::models::{Booking, ParticipationRequest};

/// GET /api/bookings/{id} - 预约详情 (含成员列表)
pub async fn detail(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<BookingDetail>> {
    let detail = state.bookings.detail(id).await?;
    Ok(Json(detail))
}

/// POST /api/bookings/{id}/requests - 申请加入
pub async fn request_join(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ParticipationRequest>> {
    let request = state.bookings.request_join(id, &user.id).await?;
    Ok(Json(request))
}

/// POST /api/bookings/{id}/requests/{request_id}/approve - 批准申请 (仅主办人)
pub async fn approve(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((id, request_id)): Path<(i64, i64)>,
) -> AppResult<Json<Booking>> {
    let booking = state.bookings.approve(id, request_id, &user.id).await?;
    Ok(Json(booking))
}

/// POST /api/bookings/{id}/requests/{request_id}/reject - 拒绝申请 (仅主办人)
pub async fn reject(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((id, request_id)): Path<(i64, i64)>,
) -> AppResult<Json<()>> {
    state.bookings.reject(id, request_id, &user.id).await?;
    Ok(Json(()))
}

/// POST /api/bookings/{id}/withdraw - 退出预约 (参与者)
pub async fn withdraw(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Booking>> {
    let booking = state.bookings.withdraw(id, &user.id).await?;
    Ok(Json(booking))
}

#[derive(serde::Deserialize, Validate)]
pub struct CancelPayload {
    #[validate(length(min = 1, max = 500))]
    pub reason: String,
}

/// POST /api/bookings/{id}/cancel - 取消预约 (仅主办人)
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<CancelPayload>,
) -> AppResult<Json<()>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    state.bookings.cancel(id, &user.id, &payload.reason).await?;
    Ok(Json(()))
}
