//! Points API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};
use shared::models::{AdjustDirection, AdjustResult, LedgerEntry, PointsAccount};

/// GET /api/points - 查询本人余额
pub async fn balance(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<PointsAccount>> {
    let account = state.points.balance(&user.id).await?;
    Ok(Json(account))
}

#[derive(serde::Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

/// GET /api/points/history - 查询本人账本 (最新在前)
pub async fn history(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<Vec<LedgerEntry>>> {
    let entries = state
        .points
        .history(&user.id, query.limit.unwrap_or(50))
        .await?;
    Ok(Json(entries))
}

#[derive(serde::Deserialize, Validate)]
pub struct AdjustPayload {
    #[validate(length(min = 1))]
    pub user_id: String,
    #[validate(range(min = 1))]
    pub amount: i64,
    pub direction: AdjustDirection,
    #[validate(length(min = 1, max = 200))]
    pub reason: String,
}

/// POST /api/points/adjust - 调整用户余额 (仅管理员)
pub async fn adjust(
    State(state): State<ServerState>,
    Json(payload): Json<AdjustPayload>,
) -> AppResult<Json<AdjustResult>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let result = state
        .points
        .adjust(
            &payload.user_id,
            payload.amount,
            payload.direction,
            &payload.reason,
        )
        .await?;
    Ok(Json(result))
}
