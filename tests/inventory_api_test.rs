mod common;

use axum::http::{Method, StatusCode};
use common::{decimal_field, response_json, TestApp};
use rust_decimal_macros::dec;
use serde_json::json;

#[tokio::test]
async fn item_list_is_public_and_carries_category_name() {
    let app = TestApp::new().await;
    let fiction = app.seed_category("Fiction").await;

    let created = app
        .expect_json(
            Method::POST,
            "/api/items",
            Some(json!({
                "name": "Dune",
                "category": fiction.id,
                "price": "12.50",
                "cost_price": "7.25",
                "stock_quantity": 8,
                "sku": "DUNE-PB"
            })),
            Some(app.staff_token()),
            StatusCode::CREATED,
        )
        .await;
    assert_eq!(created["data"]["category"], "Fiction");
    assert_eq!(created["data"]["min_stock_level"], 10);
    assert_eq!(created["data"]["is_active"], true);

    let list = app
        .expect_json(Method::GET, "/api/items", None, None, StatusCode::OK)
        .await;
    let items = list["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Dune");
    assert_eq!(items[0]["category"], "Fiction");
    assert_eq!(decimal_field(&items[0]["price"]), dec!(12.50));
}

#[tokio::test]
async fn category_can_be_given_by_name() {
    let app = TestApp::new().await;
    app.seed_category("Children").await;

    let created = app
        .expect_json(
            Method::POST,
            "/api/items",
            Some(json!({
                "name": "Gruffalo",
                "category": "Children",
                "price": 7.25,
                "stock_quantity": 4
            })),
            Some(app.admin_token()),
            StatusCode::CREATED,
        )
        .await;
    assert_eq!(created["data"]["category"], "Children");
}

#[tokio::test]
async fn unknown_category_and_negative_values_are_rejected() {
    let app = TestApp::new().await;

    for body in [
        json!({"name": "X", "category": 77, "price": 1, "stock_quantity": 1}),
        json!({"name": "X", "category": "Nope", "price": 1, "stock_quantity": 1}),
    ] {
        let response = app
            .request(Method::POST, "/api/items", Some(body), Some(app.admin_token()))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["message"], "Bad request: Invalid category");
    }

    app.seed_category("Fiction").await;
    for body in [
        json!({"name": "X", "category": "Fiction", "price": -1, "stock_quantity": 1}),
        json!({"name": "X", "category": "Fiction", "price": 1, "stock_quantity": -5}),
        json!({"name": "", "category": "Fiction", "price": 1, "stock_quantity": 1}),
    ] {
        let response = app
            .request(Method::POST, "/api/items", Some(body), Some(app.admin_token()))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn update_replaces_fields_and_missing_item_is_404() {
    let app = TestApp::new().await;
    let cat = app.seed_category("Stationery").await;
    let item = app.seed_item("Pencil", dec!(1.25), 50).await;

    let updated = app
        .expect_json(
            Method::PUT,
            &format!("/api/items/{}", item.id),
            Some(json!({
                "name": "HB Pencil",
                "category": cat.id,
                "price": 1.5,
                "stock_quantity": 45,
                "min_stock_level": 20,
                "is_active": false
            })),
            Some(app.staff_token()),
            StatusCode::OK,
        )
        .await;
    assert_eq!(updated["data"]["name"], "HB Pencil");
    assert_eq!(updated["data"]["stock_quantity"], 45);
    assert_eq!(updated["data"]["min_stock_level"], 20);
    assert_eq!(updated["data"]["is_active"], false);

    let response = app
        .request(
            Method::PUT,
            "/api/items/9999",
            Some(json!({"name": "Y", "category": cat.id, "price": 1, "stock_quantity": 1})),
            Some(app.staff_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_is_admin_only_and_blocked_by_sales_history() {
    let app = TestApp::new().await;
    let unsold = app.seed_item("Poster", dec!(3.75), 2).await;
    let sold = app.seed_item("Tote Bag", dec!(12.50), 5).await;

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/items/{}", unsold.id),
            None,
            Some(app.staff_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = app
        .expect_json(
            Method::DELETE,
            &format!("/api/items/{}", unsold.id),
            None,
            Some(app.admin_token()),
            StatusCode::OK,
        )
        .await;
    assert_eq!(body["message"], "Item deleted successfully");
    assert_eq!(body["data"]["id"], unsold.id);

    app.expect_json(
        Method::POST,
        "/api/sales",
        Some(json!({"items": [{"item_id": sold.id, "quantity": 1, "unit_price": 12.50}]})),
        Some(app.staff_token()),
        StatusCode::CREATED,
    )
    .await;

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/items/{}", sold.id),
            None,
            Some(app.admin_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .request(Method::DELETE, "/api/items/9999", None, Some(app.admin_token()))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn low_stock_uses_threshold_and_skips_inactive() {
    let app = TestApp::new().await;
    app.seed_item("Almost Gone", dec!(1.25), 2).await;
    app.seed_item("Getting Low", dec!(1.25), 9).await;
    app.seed_item("Plenty", dec!(1.25), 60).await;

    let body = app
        .expect_json(
            Method::GET,
            "/api/items/low-stock",
            None,
            Some(app.manager_token()),
            StatusCode::OK,
        )
        .await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Almost Gone", "Getting Low"]);

    let body = app
        .expect_json(
            Method::GET,
            "/api/items/low-stock?threshold=5",
            None,
            Some(app.manager_token()),
            StatusCode::OK,
        )
        .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let response = app
        .request(Method::GET, "/api/items/low-stock", None, None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn categories_crud_and_delete_detaches_items() {
    let app = TestApp::new().await;

    let created = app
        .expect_json(
            Method::POST,
            "/api/categories",
            Some(json!({"name": "Poetry", "description": "Verse"})),
            Some(app.admin_token()),
            StatusCode::CREATED,
        )
        .await;
    let id = created["data"]["id"].as_i64().unwrap();
    assert_eq!(created["data"]["color"], "bg-gray-100 text-gray-800");

    let response = app
        .request(
            Method::POST,
            "/api/categories",
            Some(json!({"name": "Poetry"})),
            Some(app.admin_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .request(
            Method::POST,
            "/api/categories",
            Some(json!({"name": "Drama"})),
            Some(app.staff_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let item = app
        .expect_json(
            Method::POST,
            "/api/items",
            Some(json!({"name": "Odes", "category": id, "price": 3.75, "stock_quantity": 3})),
            Some(app.admin_token()),
            StatusCode::CREATED,
        )
        .await;
    let item_id = item["data"]["id"].as_i64().unwrap();

    app.expect_json(
        Method::PUT,
        &format!("/api/categories/{id}"),
        Some(json!({"name": "Poems", "is_active": true})),
        Some(app.admin_token()),
        StatusCode::OK,
    )
    .await;

    let list = app
        .expect_json(Method::GET, "/api/categories", None, None, StatusCode::OK)
        .await;
    assert_eq!(list["data"][0]["name"], "Poems");

    app.expect_json(
        Method::DELETE,
        &format!("/api/categories/{id}"),
        None,
        Some(app.admin_token()),
        StatusCode::OK,
    )
    .await;

    let items = app
        .expect_json(Method::GET, "/api/items", None, None, StatusCode::OK)
        .await;
    let odes = items["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["id"].as_i64() == Some(item_id))
        .expect("item survives category delete");
    assert!(odes["category_id"].is_null());
    assert!(odes["category"].is_null());

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/categories/{id}"),
            None,
            Some(app.admin_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
