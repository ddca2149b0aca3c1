//! Notification API Handlers

use axum::{Json, extract::State};
use validator::Validate;

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

#[derive(serde::Deserialize, Validate)]
pub struct BroadcastPayload {
    #[validate(length(min = 1, max = 1000))]
    pub user_ids: Vec<String>,
    #[validate(length(min = 1, max = 50))]
    pub kind: String,
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(min = 1, max = 500))]
    pub body: String,
    pub data: Option<serde_json::Value>,
}

#[derive(serde::Serialize)]
pub struct BroadcastResult {
    /// 中继接受的通知数；分发是尽力而为，失败不计入
    pub dispatched: usize,
}

/// POST /api/notifications/broadcast - 群发通知 (仅管理员)
pub async fn broadcast(
    State(state): State<ServerState>,
    Json(payload): Json<BroadcastPayload>,
) -> AppResult<Json<BroadcastResult>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let data = payload.data.unwrap_or(serde_json::Value::Null);
    let mut dispatched = 0;
    for user_id in &payload.user_ids {
        if state
            .notifier
            .notify(user_id, &payload.kind, &payload.title, &payload.body, data.clone())
            .await
            .is_some()
        {
            dispatched += 1;
        }
    }

    Ok(Json(BroadcastResult { dispatched }))
}
