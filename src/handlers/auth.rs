use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use tracing::info;

use crate::{
    auth::{AuthRouterExt, AuthUser, ChangePasswordRequest, LoginRequest, LoginResponse, UserProfile},
    errors::ServiceError,
    handlers::common::{message_response, success_response, validate_input, AppJson},
    AppState,
};

pub fn auth_routes() -> Router<AppState> {
    let protected = Router::new()
        .route("/profile", get(profile))
        .route("/change-password", post(change_password))
        .with_auth();

    Router::new().route("/login", post(login)).merge(protected)
}

/// Exchange username and password for an access token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login succeeded", body = crate::ApiResponse<LoginResponse>),
        (status = 400, description = "Missing username or password", body = crate::errors::ErrorResponse),
        (status = 401, description = "Invalid username or password", body = crate::errors::ErrorResponse),
        (status = 429, description = "Too many login attempts", body = crate::errors::ErrorResponse),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;
    let response = state.auth.login(&payload).await?;
    Ok(success_response(response))
}

/// Current user's profile with derived permissions
#[utoipa::path(
    get,
    path = "/api/auth/profile",
    tag = "auth",
    responses(
        (status = 200, description = "Profile", body = crate::ApiResponse<UserProfile>),
        (status = 401, description = "Missing token", body = crate::errors::ErrorResponse),
        (status = 403, description = "Invalid or expired token", body = crate::errors::ErrorResponse),
        (status = 404, description = "User no longer exists", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let profile = state.auth.profile(user.user_id).await?;
    Ok(success_response(profile))
}

/// Change the current user's password
#[utoipa::path(
    post,
    path = "/api/auth/change-password",
    tag = "auth",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = crate::ApiResponse<crate::handlers::common::ResourceRef>),
        (status = 400, description = "New password too short", body = crate::errors::ErrorResponse),
        (status = 401, description = "Current password is incorrect", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn change_password(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<ChangePasswordRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;
    state.auth.change_password(user.user_id, &payload).await?;
    info!(user_id = user.user_id, "password change completed");
    Ok(message_response(user.user_id, "Password changed successfully"))
}
