//! Integration tests for reqwatch-server API endpoints
//!
//! Tests cover:
//! - Health endpoint (no auth required)
//! - Submission validation and persistence
//! - Admin read endpoint ordering and authentication

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::util::ServiceExt; // for `oneshot` method
use reqwatch_server::{build_router, db, AppState};

const TEST_SECRET: &str = "test-secret";

/// Test helper: In-memory database with schema
async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePool::connect(":memory:")
        .await
        .expect("Should open in-memory database");
    db::create_tables(&pool).await.expect("Should create schema");
    pool
}

/// Test helper: Create app with test state
fn setup_app(db: SqlitePool) -> axum::Router {
    let state = AppState::new(db, TEST_SECRET.to_string());
    build_router(state)
}

/// Test helper: JSON POST request
fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Test helper: GET request with optional bearer secret
fn get_request(uri: &str, secret: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(secret) = secret {
        builder = builder.header("authorization", format!("Bearer {}", secret));
    }
    builder.body(Body::empty()).unwrap()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

// =============================================================================
// Health Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_health_endpoint_no_auth_required() {
    let app = setup_app(setup_test_db().await);

    let response = app.oneshot(get_request("/health", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "reqwatch-server");
    assert!(body["version"].is_string());
}

// =============================================================================
// Submission Tests
// =============================================================================

#[tokio::test]
async fn test_submit_and_list_round_trip() {
    let pool = setup_test_db().await;
    let app = setup_app(pool.clone());

    let submit = post_json(
        "/api/meeting-request",
        json!({
            "preferredEmail": "customer@example.com",
            "preferredDate": "2026-08-10",
            "firmName": "Acme"
        }),
    );
    let response = app.clone().oneshot(submit).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], true);

    let response = app
        .oneshot(get_request("/api/admin/meeting-requests", Some(TEST_SECRET)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let rows = body.as_array().expect("Should be an array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["preferred_email"], "customer@example.com");
    assert_eq!(rows[0]["preferred_date"], "2026-08-10");
    assert_eq!(rows[0]["firm_name"], "Acme");
    assert_eq!(rows[0]["preferred_phone"], Value::Null);
    assert!(rows[0]["id"].is_string());
    assert!(rows[0]["created_at"].is_string());
}

#[tokio::test]
async fn test_submit_requires_email() {
    let app = setup_app(setup_test_db().await);

    let response = app
        .oneshot(post_json("/api/meeting-request", json!({"firmName": "Acme"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("preferredEmail is required"));
}

#[tokio::test]
async fn test_submit_rejects_malformed_email() {
    let app = setup_app(setup_test_db().await);

    let response = app
        .oneshot(post_json(
            "/api/meeting-request",
            json!({"preferredEmail": "not-an-email"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_submit_rejects_invalid_json() {
    let app = setup_app(setup_test_db().await);

    let request = Request::builder()
        .method("POST")
        .uri("/api/meeting-request")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Admin Read Authentication Tests
// =============================================================================

#[tokio::test]
async fn test_admin_list_requires_secret() {
    let app = setup_app(setup_test_db().await);

    let response = app
        .oneshot(get_request("/api/admin/meeting-requests", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"], "Unauthorized");
}

#[tokio::test]
async fn test_admin_list_rejects_wrong_secret() {
    let app = setup_app(setup_test_db().await);

    let response = app
        .oneshot(get_request("/api/admin/meeting-requests", Some("wrong")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_list_accepts_fallback_header() {
    let app = setup_app(setup_test_db().await);

    let request = Request::builder()
        .method("GET")
        .uri("/api/admin/meeting-requests")
        .header("x-admin-secret", TEST_SECRET)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_admin_list_rejected_when_no_secret_configured() {
    // An empty configured secret fails closed, even for an empty bearer
    let state = AppState::new(setup_test_db().await, String::new());
    let app = build_router(state);

    let response = app
        .oneshot(get_request("/api/admin/meeting-requests", Some("")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Ordering Tests
// =============================================================================

#[tokio::test]
async fn test_admin_list_newest_first() {
    let pool = setup_test_db().await;
    let app = setup_app(pool.clone());

    // Insert directly with controlled timestamps
    for (email, created_at) in [
        ("old@example.com", "2026-08-01T10:00:00.000Z"),
        ("new@example.com", "2026-08-03T10:00:00.000Z"),
        ("mid@example.com", "2026-08-02T10:00:00.000Z"),
    ] {
        sqlx::query(
            "INSERT INTO meeting_requests (id, preferred_email, created_at)
             VALUES (?, ?, ?)",
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(email)
        .bind(created_at)
        .execute(&pool)
        .await
        .unwrap();
    }

    let response = app
        .oneshot(get_request("/api/admin/meeting-requests", Some(TEST_SECRET)))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    let emails: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["preferred_email"].as_str().unwrap())
        .collect();

    assert_eq!(
        emails,
        vec!["new@example.com", "mid@example.com", "old@example.com"]
    );
}
