use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, put},
    Router,
};

use crate::{
    auth::{AuthRouterExt, Role, UserProfile},
    errors::ServiceError,
    handlers::common::{created_response, message_response, success_response, validate_input, AppJson},
    services::users::{CreateUserRequest, UpdateUserRequest},
    AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", put(update_user).delete(delete_user))
        .with_roles(&[Role::Admin])
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    responses(
        (status = 200, description = "Users without password hashes", body = crate::ApiResponse<Vec<UserProfile>>),
        (status = 403, description = "Admin only", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let users = state.services.users.list().await?;
    Ok(success_response(users))
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = crate::ApiResponse<UserProfile>),
        (status = 400, description = "Missing field or unknown role", body = crate::errors::ErrorResponse),
        (status = 409, description = "Username already taken", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn create_user(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateUserRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;
    let created = state.services.users.create(payload).await?;
    Ok(created_response(created))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = i32, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = crate::ApiResponse<UserProfile>),
        (status = 400, description = "Unknown role", body = crate::errors::ErrorResponse),
        (status = 404, description = "User not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateUserRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;
    let updated = state.services.users.update(id, payload).await?;
    Ok(success_response(updated))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = crate::ApiResponse<crate::handlers::common::ResourceRef>),
        (status = 404, description = "User not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.users.delete(id).await?;
    Ok(message_response(id, "User deleted successfully"))
}
