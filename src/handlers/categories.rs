use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, put},
    Router,
};

use crate::{
    auth::{AuthRouterExt, Role},
    entities::category,
    errors::ServiceError,
    handlers::common::{created_response, message_response, success_response, validate_input, AppJson},
    services::categories::CategoryInput,
    AppState,
};

pub fn category_routes() -> Router<AppState> {
    let manage = Router::new()
        .route("/", axum::routing::post(create_category))
        .route("/:id", put(update_category).delete(delete_category))
        .with_roles(&[Role::Admin]);

    Router::new().route("/", get(list_categories)).merge(manage)
}

/// Active categories ordered by name
#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "categories",
    responses(
        (status = 200, description = "Categories", body = crate::ApiResponse<Vec<category::Model>>),
    )
)]
pub async fn list_categories(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let categories = state.services.categories.list_active().await?;
    Ok(success_response(categories))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    tag = "categories",
    request_body = CategoryInput,
    responses(
        (status = 201, description = "Category created", body = crate::ApiResponse<category::Model>),
        (status = 400, description = "Name missing", body = crate::errors::ErrorResponse),
        (status = 403, description = "Admin only", body = crate::errors::ErrorResponse),
        (status = 409, description = "Name already used", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn create_category(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CategoryInput>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;
    let created = state.services.categories.create(payload).await?;
    Ok(created_response(created))
}

#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    tag = "categories",
    params(("id" = i32, Path, description = "Category id")),
    request_body = CategoryInput,
    responses(
        (status = 200, description = "Category updated", body = crate::ApiResponse<category::Model>),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<CategoryInput>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;
    let updated = state.services.categories.update(id, payload).await?;
    Ok(success_response(updated))
}

/// Delete a category; its items are kept without a category
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    tag = "categories",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category deleted", body = crate::ApiResponse<crate::handlers::common::ResourceRef>),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.categories.delete(id).await?;
    Ok(message_response(id, "Category deleted successfully"))
}
