//! Booking API 模块

mod handler;

use axum::{Router, routing::{get, post}};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/bookings", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/{id}", get(handler::detail))
        .route("/{id}/requests", post(handler::request_join))
        .route("/{id}/requests/{request_id}/approve", post(handler::approve))
        .route("/{id}/requests/{request_id}/reject", post(handler::reject))
        .route("/{id}/withdraw", post(handler::withdraw))
        .route("/{id}/cancel", post(handler::cancel))
}
