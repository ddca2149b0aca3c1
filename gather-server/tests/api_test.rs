//! HTTP surface tests: auth middleware, admin guard and a happy path
//! driven end-to-end through the router.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use gather_server::auth::JwtConfig;
use gather_server::core::{Config, ServerState, server};
use gather_server::db::DbService;
use gather_server::services::HttpPaymentGateway;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

async fn test_app() -> (Router, ServerState, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.db");
    let db = DbService::new(path.to_str().unwrap()).await.unwrap();

    let config = Config {
        work_dir: dir.path().to_string_lossy().into_owned(),
        http_port: 0,
        jwt: JwtConfig {
            secret: "integration-test-secret-key-32-bytes".to_string(),
            issuer: "gather-idp".to_string(),
            audience: "gather-api".to_string(),
        },
        environment: "test".to_string(),
        payment_gateway_url: "http://localhost:9".to_string(),
        payment_gateway_secret: String::new(),
        notify_endpoint: None,
    };

    // The gateway is never reached by these tests
    let gateway = Arc::new(HttpPaymentGateway::new(
        config.payment_gateway_url.clone(),
        config.payment_gateway_secret.clone(),
    ));
    let state = ServerState::from_parts(config, db.pool.clone(), gateway);
    let app = server::build_app(&state).with_state(state.clone());
    (app, state, dir)
}

fn bearer(state: &ServerState, user_id: &str, role: &str) -> String {
    let token = state.jwt_service.generate_token(user_id, role, 60).unwrap();
    format!("Bearer {token}")
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_is_public() {
    let (app, _state, _dir) = test_app().await;
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_api_requires_token() {
    let (app, _state, _dir) = test_app().await;
    let response = app
        .oneshot(Request::get("/api/points").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["code"], 1001);
}

#[tokio::test]
async fn test_garbage_token_rejected() {
    let (app, _state, _dir) = test_app().await;
    let response = app
        .oneshot(
            Request::get("/api/points")
                .header(header::AUTHORIZATION, "Bearer not.a.token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_check_in_then_balance() {
    let (app, state, _dir) = test_app().await;
    let auth = bearer(&state, "u1", "user");

    let response = app
        .clone()
        .oneshot(
            Request::post("/api/attendance/check-in")
                .header(header::AUTHORIZATION, auth.as_str())
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["record"]["consecutive_days"], 1);
    assert_eq!(body["record"]["points_awarded"], 100);

    let response = app
        .oneshot(
            Request::get("/api/points")
                .header(header::AUTHORIZATION, auth.as_str())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["balance"], 100);
}

#[tokio::test]
async fn test_duplicate_check_in_conflicts() {
    let (app, state, _dir) = test_app().await;
    let auth = bearer(&state, "u1", "user");

    let request = || {
        Request::post("/api/attendance/check-in")
            .header(header::AUTHORIZATION, auth.as_str())
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"date":"2025-01-10"}"#))
            .unwrap()
    };

    let response = app.clone().oneshot(request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["code"], 7001);
}

#[tokio::test]
async fn test_points_adjust_requires_admin() {
    let (app, state, _dir) = test_app().await;
    let payload = r#"{"user_id":"u1","amount":100,"direction":"add","reason":"gift"}"#;

    let response = app
        .clone()
        .oneshot(
            Request::post("/api/points/adjust")
                .header(header::AUTHORIZATION, bearer(&state, "u1", "user"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(
            Request::post("/api/points/adjust")
                .header(header::AUTHORIZATION, bearer(&state, "ops", "admin"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["new_balance"], 100);
}

#[tokio::test]
async fn test_coupon_issue_and_redeem_via_api() {
    let (app, state, _dir) = test_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::post("/api/coupons")
                .header(header::AUTHORIZATION, bearer(&state, "ops", "admin"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"owner_id":"u1","title":"Promo","discount":10.0,"discount_type":"percent","expiry_days":30}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let coupon = body_json(response).await;
    let coupon_id = coupon["id"].as_i64().unwrap();

    let auth = bearer(&state, "u1", "user");
    let redeem = |id: i64| {
        Request::post(format!("/api/coupons/{id}/redeem"))
            .header(header::AUTHORIZATION, auth.as_str())
            .body(Body::empty())
            .unwrap()
    };

    let response = app.clone().oneshot(redeem(coupon_id)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(redeem(coupon_id)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["code"], 6002);
}

#[tokio::test]
async fn test_refund_quote_endpoint() {
    let (app, state, _dir) = test_app().await;
    let event_at = shared::util::now_millis() + 3 * 86_400_000;

    let response = app
        .oneshot(
            Request::get(format!(
                "/api/payments/refund-quote?amount=100000&event_at={event_at}"
            ))
            .header(header::AUTHORIZATION, bearer(&state, "u1", "user"))
            .body(Body::empty())
            .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["refund_rate"], 100);
    assert_eq!(body["refund_amount"], 100_000);
}
