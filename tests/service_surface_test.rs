mod common;

use axum::http::{Method, StatusCode};
use common::{response_json, TestApp};

#[tokio::test]
async fn root_describes_the_service() {
    let app = TestApp::new().await;
    let body = app
        .expect_json(Method::GET, "/", None, None, StatusCode::OK)
        .await;
    assert_eq!(body["name"], "Bookstore POS API");
    assert_eq!(body["environment"], "test");
    assert_eq!(body["endpoints"]["sales"], "/api/sales");
}

#[tokio::test]
async fn health_reports_database_up() {
    let app = TestApp::new().await;
    let body = app
        .expect_json(Method::GET, "/api/health", None, None, StatusCode::OK)
        .await;
    assert_eq!(body["status"], "up");
    assert_eq!(body["database"], "up");
    assert_eq!(body["message"], "Bookstore POS API is running");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::new().await;
    let response = app
        .request(Method::GET, "/api-docs/openapi.json", None, None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let doc = response_json(response).await;
    assert!(doc["paths"]["/api/sales"].is_object());
    assert!(doc["components"]["securitySchemes"]["Bearer"].is_object());
}

#[tokio::test]
async fn every_response_carries_security_headers() {
    let app = TestApp::new().await;
    let response = app.request(Method::GET, "/api/items", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn malformed_json_is_a_400_with_the_error_body() {
    let app = TestApp::new().await;
    let response = app
        .request_with_headers(
            Method::POST,
            "/api/categories",
            None,
            Some(app.admin_token()),
            &[("content-type", "application/json")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Bad Request");
    assert!(body["timestamp"].is_string());
}
