use axum::{extract::State, response::IntoResponse, routing::get, Router};

use crate::{
    auth::{AuthRouterExt, Role},
    errors::ServiceError,
    handlers::common::success_response,
    services::{
        items::ItemWithCategory,
        reports::{DailySalesRow, TopSellingRow},
    },
    AppState,
};

pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/daily-sales", get(daily_sales))
        .route("/top-selling", get(top_selling))
        .route("/low-stock", get(low_stock))
        .with_roles(&[Role::Admin, Role::Staff, Role::Manager])
}

/// Per-day totals for the 30 most recent days with sales
#[utoipa::path(
    get,
    path = "/api/reports/daily-sales",
    tag = "reports",
    responses(
        (status = 200, description = "Daily totals, newest first", body = crate::ApiResponse<Vec<DailySalesRow>>),
        (status = 401, description = "Missing token", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn daily_sales(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let rows = state.services.reports.daily_sales().await?;
    Ok(success_response(rows))
}

#[utoipa::path(
    get,
    path = "/api/reports/top-selling",
    tag = "reports",
    responses(
        (status = 200, description = "Top 20 items by units sold", body = crate::ApiResponse<Vec<TopSellingRow>>),
    ),
    security(("Bearer" = []))
)]
pub async fn top_selling(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let rows = state.services.reports.top_selling().await?;
    Ok(success_response(rows))
}

#[utoipa::path(
    get,
    path = "/api/reports/low-stock",
    tag = "reports",
    responses(
        (status = 200, description = "Active items at or below their reorder point", body = crate::ApiResponse<Vec<ItemWithCategory>>),
    ),
    security(("Bearer" = []))
)]
pub async fn low_stock(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let rows = state.services.reports.low_stock().await?;
    Ok(success_response(rows))
}
