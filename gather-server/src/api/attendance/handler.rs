//! Attendance API Handlers

use axum::{Json, extract::State};
use chrono::NaiveDate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::AppResult;
use shared::models::{CheckInResult, UserStats};

#[derive(serde::Deserialize, Default)]
pub struct CheckInPayload {
    /// 打卡日期，缺省为服务器 UTC 当天
    pub date: Option<NaiveDate>,
}

/// POST /api/attendance/check-in - 每日打卡
pub async fn check_in(
    State(state): State<ServerState>,
    user: CurrentUser,
    payload: Option<Json<CheckInPayload>>,
) -> AppResult<Json<CheckInResult>> {
    let date = payload
        .and_then(|Json(p)| p.date)
        .unwrap_or_else(|| chrono::Utc::now().date_naive());
    let result = state.attendance.check_in(&user.id, date).await?;
    Ok(Json(result))
}

/// GET /api/attendance/stats - 本人出席统计
pub async fn stats(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<UserStats>> {
    let stats = state.attendance.stats(&user.id).await?;
    Ok(Json(stats))
}
