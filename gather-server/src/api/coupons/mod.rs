//! Coupon API 模块

mod handler;

use axum::{Router, middleware, routing::{get, post}};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/coupons", routes())
}

fn routes() -> Router<ServerState> {
    // 本人路由：列表与核销
    let user_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}/redeem", post(handler::redeem));

    // 管理路由：发放是特权操作
    let manage_routes = Router::new()
        .route("/", post(handler::issue))
        .layer(middleware::from_fn(require_admin));

    user_routes.merge(manage_routes)
}
