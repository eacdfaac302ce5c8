//! Requests through the full middleware stack that are answered before any
//! database access.

mod common;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use chrono::Utc;
use serde_json::{Value, json};
use storefront_api::{
    app::build_app,
    middleware::auth::{decode_token, extract_token, session_cookie},
    models::AdminUser,
    services::auth_service::{TOKEN_TTL_HOURS, issue_token},
};
use tower::ServiceExt;
use uuid::Uuid;

fn app() -> Router {
    build_app(common::offline_state(), &["http://localhost:3000".to_string()])
}

fn token_for(role: &str) -> String {
    let user = AdminUser {
        id: Uuid::new_v4(),
        username: "tester".into(),
        role: role.into(),
        created_at: Utc::now(),
    };
    issue_token(&user, common::TEST_JWT_SECRET).expect("token")
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_is_served_at_root() {
    let request = Request::get("/health").body(Body::empty()).unwrap();
    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn unknown_paths_get_json_not_found() {
    let request = Request::get("/api/nope").body(Body::empty()).unwrap();
    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["data"]["path"], "/api/nope");
}

#[tokio::test]
async fn request_id_is_propagated() {
    let request = Request::get("/health")
        .header("x-request-id", "abc-123")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(
        response.headers().get("x-request-id").and_then(|v| v.to_str().ok()),
        Some("abc-123")
    );
}

#[tokio::test]
async fn admin_routes_require_a_token() {
    for uri in [
        "/api/admin/orders",
        "/api/admin/customers",
        "/api/admin/returns",
        "/api/admin/products",
        "/api/admin/sales/analytics",
        "/api/admin/analytics/sales-trends",
        "/api/admin/analytics/geographic-sales",
        "/api/admin/analytics/customer-analytics",
    ] {
        let request = Request::get(uri).body(Body::empty()).unwrap();
        let (status, _) = send(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn tampered_token_is_unauthorized() {
    let request = Request::get("/api/admin/sales/analytics")
        .header(header::AUTHORIZATION, format!("Bearer {}x", token_for("admin")))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_admin_role_is_forbidden() {
    let request = Request::get("/api/admin/analytics/customer-analytics")
        .header(header::COOKIE, format!("theme=dark; token={}", token_for("viewer")))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(request).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn out_of_range_trend_period_is_rejected() {
    let request = Request::get("/api/admin/analytics/sales-trends?period=0")
        .header(header::AUTHORIZATION, format!("Bearer {}", token_for("admin")))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn empty_cart_is_rejected() {
    let (status, body) = send(post_json(
        "/api/orders",
        json!({
            "formData": { "fullName": "Ada", "email": "ada@example.com" },
            "cartItems": [],
        }),
    ))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["error"], "Bad Request Cart is empty");
}

#[tokio::test]
async fn sell_inquiry_is_acknowledged_without_orders() {
    let (status, body) = send(post_json(
        "/api/create-payment",
        json!({
            "contact": { "name": "Ada", "email": "ada@example.com" },
            "cartItems": [{ "id": "gen_1", "price": 0, "quantity": 1, "type": "sell_inquiry" }],
        }),
    ))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["kind"], "sell_inquiry");
    assert_eq!(body["data"]["orderIds"], json!([]));
    assert!(body["data"]["orderNumber"].as_str().unwrap().starts_with("FS-"));
}

#[tokio::test]
async fn unknown_status_is_rejected_before_lookup() {
    let (status, _) = send(post_json(
        "/api/update-order-status",
        json!({ "orderNumber": "FS-1-abc", "status": "teleported" }),
    ))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = Request::put(format!("/api/admin/orders/{}/status", Uuid::new_v4()))
        .header(header::AUTHORIZATION, format!("Bearer {}", token_for("admin")))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "status": "teleported" }).to_string()))
        .unwrap();
    let (status, _) = send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bulk_update_needs_ids() {
    let request = Request::put("/api/admin/orders/bulk-update")
        .header(header::AUTHORIZATION, format!("Bearer {}", token_for("admin")))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "orderIds": [], "newStatus": "shipped" }).to_string()))
        .unwrap();
    let (status, _) = send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn payment_verification_without_gateway_is_bad_gateway() {
    let (status, _) = send(post_json("/api/verify-payment", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(post_json("/api/verify-payment", json!({ "reference": "ref-1" }))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn logout_clears_the_cookie() {
    let request = Request::post("/api/admin/logout").body(Body::empty()).unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(cookie.starts_with("token=;"));
    assert!(cookie.contains("Max-Age=0"));
    assert!(cookie.contains("HttpOnly"));
}

#[test]
fn empty_token_cookie_is_ignored() {
    let mut headers = axum::http::HeaderMap::new();
    headers.insert(header::COOKIE, "token=; theme=dark".parse().unwrap());
    assert_eq!(extract_token(&headers), None);
}

#[test]
fn session_cookie_round_trips_through_extraction() {
    let token = token_for("admin");
    let cookie = session_cookie(token.clone(), TOKEN_TTL_HOURS);
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.max_age(), Some(time::Duration::hours(TOKEN_TTL_HOURS)));

    let mut headers = axum::http::HeaderMap::new();
    let request_cookie = format!("theme=dark; {}", cookie.stripped());
    headers.insert(header::COOKIE, request_cookie.parse().unwrap());

    let extracted = extract_token(&headers).expect("token in cookie");
    assert_eq!(extracted, token);
    let user = decode_token(&extracted, common::TEST_JWT_SECRET).expect("valid");
    assert_eq!(user.role, "admin");
    assert_eq!(user.username, "tester");
}

#[test]
fn bearer_header_wins_over_cookie() {
    let mut headers = axum::http::HeaderMap::new();
    headers.insert(header::AUTHORIZATION, "Bearer from-header".parse().unwrap());
    headers.insert(header::COOKIE, "token=from-cookie".parse().unwrap());
    assert_eq!(extract_token(&headers).as_deref(), Some("from-header"));
}
