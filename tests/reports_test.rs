mod common;

use axum::http::{Method, StatusCode};
use chrono::Utc;
use common::{decimal_field, TestApp};
use rust_decimal_macros::dec;
use serde_json::json;

async fn sell(app: &TestApp, lines: serde_json::Value) {
    app.expect_json(
        Method::POST,
        "/api/sales",
        Some(json!({ "items": lines })),
        Some(app.staff_token()),
        StatusCode::CREATED,
    )
    .await;
}

#[tokio::test]
async fn daily_sales_sums_todays_transactions() {
    let app = TestApp::new().await;
    let a = app.seed_item("Essays", dec!(12.50), 50).await;
    let b = app.seed_item("Postcard", dec!(1.25), 50).await;

    sell(&app, json!([{"item_id": a.id, "quantity": 2, "unit_price": 12.50}])).await;
    sell(
        &app,
        json!([
            {"item_id": a.id, "quantity": 1, "unit_price": 12.50},
            {"item_id": b.id, "quantity": 4, "unit_price": 1.25}
        ]),
    )
    .await;

    let body = app
        .expect_json(
            Method::GET,
            "/api/reports/daily-sales",
            None,
            Some(app.manager_token()),
            StatusCode::OK,
        )
        .await;
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0]["sale_date"],
        Utc::now().date_naive().format("%Y-%m-%d").to_string()
    );
    assert_eq!(rows[0]["total_transactions"], 2);
    assert_eq!(rows[0]["total_items_sold"], 7);
    assert_eq!(decimal_field(&rows[0]["total_revenue"]), dec!(42.50));
}

#[tokio::test]
async fn top_selling_orders_by_units() {
    let app = TestApp::new().await;
    let slow = app.seed_item("Slow Seller", dec!(12.50), 50).await;
    let fast = app.seed_item("Fast Seller", dec!(3.75), 50).await;
    app.seed_item("Never Sold", dec!(7.25), 50).await;

    sell(&app, json!([{"item_id": slow.id, "quantity": 1, "unit_price": 12.50}])).await;
    sell(&app, json!([{"item_id": fast.id, "quantity": 3, "unit_price": 3.75}])).await;
    sell(&app, json!([{"item_id": fast.id, "quantity": 2, "unit_price": 3.75}])).await;

    let body = app
        .expect_json(
            Method::GET,
            "/api/reports/top-selling",
            None,
            Some(app.admin_token()),
            StatusCode::OK,
        )
        .await;
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["item_name"], "Fast Seller");
    assert_eq!(rows[0]["total_sold"], 5);
    assert_eq!(decimal_field(&rows[0]["total_revenue"]), dec!(18.75));
    assert_eq!(rows[1]["item_id"], slow.id);
    assert_eq!(rows[1]["total_sold"], 1);
}

#[tokio::test]
async fn low_stock_report_uses_each_items_reorder_point() {
    let app = TestApp::new().await;
    app.seed_item("At Reorder Point", dec!(1.25), 10).await;
    app.seed_item("Below", dec!(1.25), 3).await;
    app.seed_item("Healthy", dec!(1.25), 11).await;

    let body = app
        .expect_json(
            Method::GET,
            "/api/reports/low-stock",
            None,
            Some(app.staff_token()),
            StatusCode::OK,
        )
        .await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Below", "At Reorder Point"]);
}

#[tokio::test]
async fn reports_are_empty_without_sales() {
    let app = TestApp::new().await;

    for uri in ["/api/reports/daily-sales", "/api/reports/top-selling"] {
        let body = app
            .expect_json(Method::GET, uri, None, Some(app.staff_token()), StatusCode::OK)
            .await;
        assert!(body["data"].as_array().unwrap().is_empty(), "{uri}");
    }
}
