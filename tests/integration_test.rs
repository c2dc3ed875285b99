//! Integration tests for the account routes and service endpoints.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use rust_decimal_macros::dec;
use tower::ServiceExt;

use banking_outcome_api::api::create_router;
use banking_outcome_api::app::AppState;
use banking_outcome_api::domain::messages::{INVALID_SEARCH_CRITERIA, NO_ACCOUNT_FOUND};
use banking_outcome_api::domain::{Account, ErrorResponse, HealthResponse, HealthStatus};
use banking_outcome_api::test_utils::MockDatabaseClient;

fn create_test_state() -> (Arc<AppState>, Arc<MockDatabaseClient>) {
    let db = Arc::new(MockDatabaseClient::new());
    let state = Arc::new(AppState::new(Arc::clone(&db) as _));
    (state, db)
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_lookup_with_padded_sort_code_reports_no_account() {
    let (state, _db) = create_test_state();
    let router = create_router(state);

    let request = json_request(
        "POST",
        "/api/v1/accounts",
        serde_json::json!({ "sortCode": " 12-34-56 ", "accountNumber": "12345678" }),
    );

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain")
    );
    assert_eq!(body_text(response).await, NO_ACCOUNT_FOUND);
}

#[tokio::test]
async fn test_lookup_returns_account_json() {
    let (state, db) = create_test_state();
    let seeded = db.seed_account("53-68-92", "73084635", dec!(1071.78));
    let router = create_router(state);

    let request = json_request(
        "POST",
        "/api/v1/accounts",
        serde_json::json!({ "sortCode": "53-68-92", "accountNumber": "73084635" }),
    );

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let account: Account = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(account.id, seeded.id);
    assert_eq!(account.current_balance, dec!(1071.78));
}

#[tokio::test]
async fn test_lookup_with_malformed_sort_code_is_bad_request() {
    let (state, _db) = create_test_state();
    let router = create_router(state);

    let request = json_request(
        "POST",
        "/api/v1/accounts",
        serde_json::json!({ "sortCode": "123456", "accountNumber": "12345678" }),
    );

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, INVALID_SEARCH_CRITERIA);
}

#[tokio::test]
async fn test_missing_field_reports_field_map() {
    let (state, _db) = create_test_state();
    let router = create_router(state);

    let request = json_request(
        "POST",
        "/api/v1/accounts",
        serde_json::json!({ "sortCode": "12-34-56" }),
    );

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let error: ErrorResponse = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(error.error.r#type, "validation_error");
    let fields = error.error.fields.expect("field map");
    assert_eq!(
        fields.get("account_number").map(String::as_str),
        Some("Account number is mandatory")
    );
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let (state, _db) = create_test_state();
    let router = create_router(state);

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/accounts")
        .header("Content-Type", "application/json")
        .body(Body::from("{ not json"))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_create_account_then_look_it_up() {
    let (state, _db) = create_test_state();
    let router = create_router(state);

    let request = json_request(
        "PUT",
        "/api/v1/accounts",
        serde_json::json!({ "bankName": " Example Bank ", "ownerName": "Jane Doe" }),
    );
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let created: Account = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(created.bank_name, "Example Bank");
    assert_eq!(created.current_balance, dec!(0));

    let request = json_request(
        "POST",
        "/api/v1/accounts",
        serde_json::json!({
            "sortCode": created.sort_code,
            "accountNumber": created.account_number,
        }),
    );
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let found: Account = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(found.id, created.id);
}

#[tokio::test]
async fn test_create_account_with_blank_owner_is_bad_request() {
    let (state, _db) = create_test_state();
    let router = create_router(state);

    let request = json_request(
        "PUT",
        "/api/v1/accounts",
        serde_json::json!({ "bankName": "Example Bank", "ownerName": "   " }),
    );

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, INVALID_SEARCH_CRITERIA);
}

#[tokio::test]
async fn test_store_failure_maps_to_error_response() {
    let db = Arc::new(MockDatabaseClient::failing("connection reset"));
    let router = create_router(Arc::new(AppState::new(db as _)));

    let request = json_request(
        "POST",
        "/api/v1/accounts",
        serde_json::json!({ "sortCode": "12-34-56", "accountNumber": "12345678" }),
    );

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let error: ErrorResponse = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(error.error.r#type, "database_error");
}

#[tokio::test]
async fn test_health_check_healthy() {
    let (state, _db) = create_test_state();
    let router = create_router(state);

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let health: HealthResponse = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(health.status, HealthStatus::Healthy);
}

#[tokio::test]
async fn test_readiness_reflects_store_health() {
    let (state, db) = create_test_state();
    let router = create_router(state);

    let request = Request::builder()
        .uri("/health/ready")
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    db.set_healthy(false);
    let request = Request::builder()
        .uri("/health/ready")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_liveness() {
    let (state, _db) = create_test_state();
    let router = create_router(state);

    let request = Request::builder()
        .uri("/health/live")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_openapi_document_served() {
    let (state, _db) = create_test_state();
    let router = create_router(state);

    let request = Request::builder()
        .uri("/api-docs/openapi.json")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let doc: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
    assert!(doc["paths"]["/api/v1/accounts"].is_object());
}
