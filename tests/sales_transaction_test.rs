mod common;

use axum::http::{Method, StatusCode};
use bookstore_pos_api::entities::{sale, sale_item};
use common::{decimal_field, TestApp};
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::json;

#[tokio::test]
async fn sale_decrements_stock_and_records_lines() {
    let app = TestApp::new().await;
    let novel = app.seed_item("The Hobbit", dec!(12.50), 5).await;
    let pen = app.seed_item("Fountain Pen", dec!(3.75), 40).await;

    let body = app
        .expect_json(
            Method::POST,
            "/api/sales",
            Some(json!({
                "items": [
                    {"item_id": novel.id, "quantity": 2, "unit_price": "12.50"},
                    {"item_id": pen.id, "quantity": 4, "unit_price": 3.75}
                ],
                "customer_name": "Walk-in",
                "payment_method": "card"
            })),
            Some(app.staff_token()),
            StatusCode::CREATED,
        )
        .await;

    assert_eq!(body["success"], true);
    let sale_id = body["data"]["sale_id"].as_i64().expect("sale id") as i32;
    let sale_number = body["data"]["sale_number"].as_str().expect("sale number");
    assert!(sale_number.starts_with("SALE-"), "{sale_number}");
    assert_eq!(decimal_field(&body["data"]["total_amount"]), dec!(40.00));

    assert_eq!(app.stock_of(novel.id).await, 3);
    assert_eq!(app.stock_of(pen.id).await, 36);

    let detail = app
        .expect_json(
            Method::GET,
            &format!("/api/sales/{sale_id}"),
            None,
            Some(app.staff_token()),
            StatusCode::OK,
        )
        .await;
    assert_eq!(detail["data"]["sale"]["staff_id"], app.staff.id);
    assert_eq!(detail["data"]["sale"]["payment_method"], "card");
    let lines = detail["data"]["items"].as_array().expect("lines");
    assert_eq!(lines.len(), 2);
    let line_sum = lines
        .iter()
        .map(|l| decimal_field(&l["line_total"]))
        .sum::<rust_decimal::Decimal>();
    assert_eq!(line_sum, decimal_field(&detail["data"]["sale"]["total_amount"]));
}

#[tokio::test]
async fn insufficient_stock_rolls_back_every_line() {
    let app = TestApp::new().await;
    let plenty = app.seed_item("Bookmark", dec!(1.25), 100).await;
    let scarce = app.seed_item("Signed First Edition", dec!(99.50), 1).await;

    let response = app
        .request(
            Method::POST,
            "/api/sales",
            Some(json!({
                "items": [
                    {"item_id": plenty.id, "quantity": 10, "unit_price": 1.25},
                    {"item_id": scarce.id, "quantity": 2, "unit_price": 99.50}
                ]
            })),
            Some(app.staff_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(app.stock_of(plenty.id).await, 100);
    assert_eq!(app.stock_of(scarce.id).await, 1);
    assert_eq!(sale::Entity::find().count(&*app.state.db).await.unwrap(), 0);
    assert_eq!(
        sale_item::Entity::find().count(&*app.state.db).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn unknown_item_is_404_and_nothing_is_written() {
    let app = TestApp::new().await;
    let item = app.seed_item("Atlas", dec!(20.00), 3).await;

    let response = app
        .request(
            Method::POST,
            "/api/sales",
            Some(json!({
                "items": [
                    {"item_id": item.id, "quantity": 1, "unit_price": 20},
                    {"item_id": 9999, "quantity": 1, "unit_price": 5}
                ]
            })),
            Some(app.admin_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.stock_of(item.id).await, 3);
    assert_eq!(sale::Entity::find().count(&*app.state.db).await.unwrap(), 0);
}

#[tokio::test]
async fn invalid_lines_are_rejected_before_touching_stock() {
    let app = TestApp::new().await;
    let item = app.seed_item("Map", dec!(7.25), 10).await;

    for items in [
        json!([]),
        json!([{"item_id": item.id, "quantity": 0, "unit_price": 7.25}]),
        json!([{"item_id": item.id, "quantity": -3, "unit_price": 7.25}]),
        json!([{"item_id": item.id, "quantity": 1, "unit_price": -1}]),
    ] {
        let response = app
            .request(
                Method::POST,
                "/api/sales",
                Some(json!({ "items": items })),
                Some(app.staff_token()),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{items}");
    }

    assert_eq!(app.stock_of(item.id).await, 10);
}

#[tokio::test]
async fn sale_history_is_newest_first() {
    let app = TestApp::new().await;
    let item = app.seed_item("Notebook", dec!(3.75), 10).await;

    let mut ids = Vec::new();
    for _ in 0..3 {
        let body = app
            .expect_json(
                Method::POST,
                "/api/sales",
                Some(json!({"items": [{"item_id": item.id, "quantity": 1, "unit_price": 3.75}]})),
                Some(app.admin_token()),
                StatusCode::CREATED,
            )
            .await;
        ids.push(body["data"]["sale_id"].as_i64().unwrap());
    }

    let history = app
        .expect_json(
            Method::GET,
            "/api/sales",
            None,
            Some(app.manager_token()),
            StatusCode::OK,
        )
        .await;
    let listed: Vec<i64> = history["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_i64().unwrap())
        .collect();
    ids.reverse();
    assert_eq!(listed, ids);
    assert_eq!(app.stock_of(item.id).await, 7);
}

#[tokio::test]
async fn missing_sale_is_404() {
    let app = TestApp::new().await;
    let response = app
        .request(Method::GET, "/api/sales/424242", None, Some(app.staff_token()))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn oversized_price_is_a_400_not_a_crash() {
    let app = TestApp::new().await;
    let book = app.seed_item("Atlas", dec!(45.50), 10).await;

    for price in [json!("79228162514264337593543950335"), json!("5000000000.00")] {
        let response = app
            .request(
                Method::POST,
                "/api/sales",
                Some(json!({"items": [{"item_id": book.id, "quantity": 2, "unit_price": price}]})),
                Some(app.staff_token()),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{price}");
    }

    assert_eq!(app.stock_of(book.id).await, 10);
    assert_eq!(sale::Entity::find().count(&*app.state.db).await.unwrap(), 0);
}

#[tokio::test]
async fn sub_cent_prices_are_rejected() {
    let app = TestApp::new().await;
    let card = app.seed_item("Greeting Card", dec!(2.50), 10).await;

    let response = app
        .request(
            Method::POST,
            "/api/sales",
            Some(json!({"items": [
                {"item_id": card.id, "quantity": 1, "unit_price": "0.005"},
                {"item_id": card.id, "quantity": 1, "unit_price": "0.005"}
            ]})),
            Some(app.staff_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.stock_of(card.id).await, 10);
    assert_eq!(sale_item::Entity::find().count(&*app.state.db).await.unwrap(), 0);
}

#[tokio::test]
async fn stored_rows_reconcile_with_the_header() {
    let app = TestApp::new().await;
    let atlas = app.seed_item("Road Atlas", dec!(19.75), 20).await;
    let map = app.seed_item("City Map", dec!(4.25), 20).await;

    let body = app
        .expect_json(
            Method::POST,
            "/api/sales",
            Some(json!({"items": [
                {"item_id": atlas.id, "quantity": 3, "unit_price": "19.750"},
                {"item_id": map.id, "quantity": 5, "unit_price": "4.25"},
                {"item_id": atlas.id, "quantity": 1, "unit_price": "18.50"}
            ]})),
            Some(app.staff_token()),
            StatusCode::CREATED,
        )
        .await;
    let sale_id = body["data"]["sale_id"].as_i64().unwrap() as i32;

    let header = sale::Entity::find_by_id(sale_id)
        .one(&*app.state.db)
        .await
        .unwrap()
        .expect("sale row");
    let lines = sale_item::Entity::find()
        .filter(sale_item::Column::SaleId.eq(sale_id))
        .all(&*app.state.db)
        .await
        .unwrap();

    assert_eq!(lines.len(), 3);
    for line in &lines {
        assert_eq!(line.line_total, line.unit_price * rust_decimal::Decimal::from(line.quantity));
    }
    let line_sum: rust_decimal::Decimal = lines.iter().map(|l| l.line_total).sum();
    assert_eq!(line_sum, header.total_amount);
    assert_eq!(header.total_amount, dec!(99.00));
    assert_eq!(app.stock_of(atlas.id).await, 16);
}
