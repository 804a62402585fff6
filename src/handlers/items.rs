use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    auth::{AuthRouterExt, Role},
    entities::item::DEFAULT_MIN_STOCK_LEVEL,
    errors::ServiceError,
    handlers::common::{created_response, message_response, success_response, validate_input, AppJson},
    services::items::{ItemInput, ItemWithCategory},
    AppState,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct LowStockQuery {
    /// Stock level at or below which an item is listed (default 10)
    pub threshold: Option<i32>,
}

pub fn item_routes() -> Router<AppState> {
    let low_stock = Router::new()
        .route("/low-stock", get(low_stock_items))
        .with_auth();

    let edit = Router::new()
        .route("/", post(create_item))
        .route("/:id", put(update_item))
        .with_roles(&[Role::Admin, Role::Staff]);

    let remove = Router::new()
        .route("/:id", delete(delete_item))
        .with_roles(&[Role::Admin]);

    Router::new()
        .route("/", get(list_items))
        .merge(low_stock)
        .merge(edit)
        .merge(remove)
}

/// All items with their category name, ordered by name
#[utoipa::path(
    get,
    path = "/api/items",
    tag = "items",
    responses(
        (status = 200, description = "Items", body = crate::ApiResponse<Vec<ItemWithCategory>>),
    )
)]
pub async fn list_items(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let items = state.services.items.list().await?;
    Ok(success_response(items))
}

#[utoipa::path(
    get,
    path = "/api/items/low-stock",
    tag = "items",
    params(LowStockQuery),
    responses(
        (status = 200, description = "Active items at or below the threshold", body = crate::ApiResponse<Vec<ItemWithCategory>>),
        (status = 401, description = "Missing token", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn low_stock_items(
    State(state): State<AppState>,
    Query(query): Query<LowStockQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let threshold = query.threshold.unwrap_or(DEFAULT_MIN_STOCK_LEVEL);
    let items = state.services.items.low_stock(threshold).await?;
    Ok(success_response(items))
}

/// Add an item; `category` may be an id or a category name
#[utoipa::path(
    post,
    path = "/api/items",
    tag = "items",
    request_body = ItemInput,
    responses(
        (status = 201, description = "Item created", body = crate::ApiResponse<ItemWithCategory>),
        (status = 400, description = "Missing fields, invalid category or oversized image", body = crate::errors::ErrorResponse),
        (status = 403, description = "Admin or staff only", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn create_item(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ItemInput>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;
    let created = state.services.items.create(payload).await?;
    Ok(created_response(created))
}

#[utoipa::path(
    put,
    path = "/api/items/{id}",
    tag = "items",
    params(("id" = i32, Path, description = "Item id")),
    request_body = ItemInput,
    responses(
        (status = 200, description = "Item updated", body = crate::ApiResponse<ItemWithCategory>),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorResponse),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<ItemInput>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;
    let updated = state.services.items.update(id, payload).await?;
    Ok(success_response(updated))
}

#[utoipa::path(
    delete,
    path = "/api/items/{id}",
    tag = "items",
    params(("id" = i32, Path, description = "Item id")),
    responses(
        (status = 200, description = "Item deleted", body = crate::ApiResponse<crate::handlers::common::ResourceRef>),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Item has recorded sales", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.items.delete(id).await?;
    Ok(message_response(id, "Item deleted successfully"))
}
