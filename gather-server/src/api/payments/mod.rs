//! Payment API 模块

mod handler;

use axum::{Router, routing::{get, post}};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/payments", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/confirm", post(handler::confirm))
        .route("/refund-quote", get(handler::refund_quote))
        .route("/{order_id}/cancel", post(handler::cancel))
}
