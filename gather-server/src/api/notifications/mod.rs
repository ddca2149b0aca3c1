//! Notification API 模块

mod handler;

use axum::{Router, middleware, routing::post};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/notifications", routes())
}

fn routes() -> Router<ServerState> {
    // 广播是特权操作
    Router::new()
        .route("/broadcast", post(handler::broadcast))
        .layer(middleware::from_fn(require_admin))
}
