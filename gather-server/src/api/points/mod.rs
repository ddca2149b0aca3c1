//! Points API 模块

mod handler;

use axum::{Router, middleware, routing::{get, post}};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/points", routes())
}

fn routes() -> Router<ServerState> {
    // 本人读取路由
    let read_routes = Router::new()
        .route("/", get(handler::balance))
        .route("/history", get(handler::history));

    // 管理路由：积分调整是特权操作
    let manage_routes = Router::new()
        .route("/adjust", post(handler::adjust))
        .layer(middleware::from_fn(require_admin));

    read_routes.merge(manage_routes)
}
