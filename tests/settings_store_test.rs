mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn upsert_creates_then_overwrites_by_key() {
    let app = TestApp::new().await;

    let created = app
        .expect_json(
            Method::POST,
            "/api/settings",
            Some(json!({
                "setting_key": "currency",
                "setting_value": "USD",
                "setting_category": "general",
                "is_public": true,
                "description": "Receipt currency"
            })),
            Some(app.admin_token()),
            StatusCode::CREATED,
        )
        .await;
    let id = created["data"]["id"].clone();
    assert_eq!(created["data"]["setting_value"], "USD");

    let again = app
        .expect_json(
            Method::POST,
            "/api/settings",
            Some(json!({"setting_key": "currency", "setting_value": "EUR"})),
            Some(app.admin_token()),
            StatusCode::CREATED,
        )
        .await;
    assert_eq!(again["data"]["id"], id);
    assert_eq!(again["data"]["setting_value"], "EUR");
    assert_eq!(again["data"]["setting_category"], "system_settings");
    assert_eq!(again["data"]["is_public"], false);

    let all = app
        .expect_json(Method::GET, "/api/settings", None, None, StatusCode::OK)
        .await;
    assert_eq!(all["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn non_string_values_are_stored_as_json_text() {
    let app = TestApp::new().await;

    let saved = app
        .expect_json(
            Method::POST,
            "/api/settings",
            Some(json!({"setting_key": "tax_rate", "setting_value": 7.5})),
            Some(app.admin_token()),
            StatusCode::CREATED,
        )
        .await;
    assert_eq!(saved["data"]["setting_value"], "7.5");

    let updated = app
        .expect_json(
            Method::PUT,
            "/api/settings/tax_rate",
            Some(json!({"value": {"standard": 8, "reduced": 5}})),
            Some(app.admin_token()),
            StatusCode::OK,
        )
        .await;
    let text = updated["data"]["setting_value"].as_str().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(text).unwrap();
    assert_eq!(parsed["standard"], 8);
}

#[tokio::test]
async fn update_rejects_missing_key_and_null_value() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::PUT,
            "/api/settings/no_such_key",
            Some(json!({"value": "x"})),
            Some(app.admin_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    app.expect_json(
        Method::POST,
        "/api/settings",
        Some(json!({"setting_key": "theme", "setting_value": "dark"})),
        Some(app.admin_token()),
        StatusCode::CREATED,
    )
    .await;

    let response = app
        .request(
            Method::PUT,
            "/api/settings/theme",
            Some(json!({"value": null})),
            Some(app.admin_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .request(
            Method::POST,
            "/api/settings",
            Some(json!({"setting_key": "", "setting_value": "x"})),
            Some(app.admin_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn public_listing_hides_private_settings() {
    let app = TestApp::new().await;

    for (key, public) in [("store_motto", true), ("supplier_api_key", false)] {
        app.expect_json(
            Method::POST,
            "/api/settings",
            Some(json!({"setting_key": key, "setting_value": "x", "is_public": public})),
            Some(app.admin_token()),
            StatusCode::CREATED,
        )
        .await;
    }

    for uri in ["/api/settings/public", "/api/settings?public=true"] {
        let body = app
            .expect_json(Method::GET, uri, None, None, StatusCode::OK)
            .await;
        let keys: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["setting_key"].as_str().unwrap())
            .collect();
        assert_eq!(keys, vec!["store_motto"], "{uri}");
    }
}

#[tokio::test]
async fn store_details_default_then_saved() {
    let app = TestApp::new().await;

    let first = app
        .expect_json(Method::GET, "/api/store-details", None, None, StatusCode::OK)
        .await;
    assert_eq!(first["data"]["name"], "Bookstore");
    let id = first["data"]["id"].clone();

    let saved = app
        .expect_json(
            Method::PUT,
            "/api/store-details",
            Some(json!({
                "name": "Corner Books",
                "address": "1 High Street",
                "receipt_footer": "Thank you for reading"
            })),
            Some(app.admin_token()),
            StatusCode::OK,
        )
        .await;
    assert_eq!(saved["data"]["id"], id);
    assert_eq!(saved["data"]["name"], "Corner Books");

    let read = app
        .expect_json(Method::GET, "/api/store-details", None, None, StatusCode::OK)
        .await;
    assert_eq!(read["data"]["receipt_footer"], "Thank you for reading");

    let response = app
        .request(
            Method::PUT,
            "/api/store-details",
            Some(json!({"name": ""})),
            Some(app.admin_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
