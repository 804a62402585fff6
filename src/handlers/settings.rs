use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    auth::{AuthRouterExt, Role},
    entities::system_setting,
    errors::ServiceError,
    handlers::common::{created_response, success_response, validate_input, AppJson},
    services::settings::{UpdateSettingValue, UpsertSettingRequest},
    AppState,
};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SettingsQuery {
    /// Only settings flagged public
    pub public: Option<bool>,
}

pub fn settings_routes() -> Router<AppState> {
    let admin = Router::new()
        .route("/", post(upsert_setting))
        .route("/:key", put(update_setting))
        .with_roles(&[Role::Admin]);

    Router::new()
        .route("/", get(list_settings))
        .route("/public", get(list_public_settings))
        .merge(admin)
}

#[utoipa::path(
    get,
    path = "/api/settings",
    tag = "settings",
    params(SettingsQuery),
    responses(
        (status = 200, description = "Settings ordered by category and key", body = crate::ApiResponse<Vec<system_setting::Model>>),
    )
)]
pub async fn list_settings(
    State(state): State<AppState>,
    Query(query): Query<SettingsQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let settings = state
        .services
        .settings
        .list(query.public.unwrap_or(false))
        .await?;
    Ok(success_response(settings))
}

#[utoipa::path(
    get,
    path = "/api/settings/public",
    tag = "settings",
    responses(
        (status = 200, description = "Public settings", body = crate::ApiResponse<Vec<system_setting::Model>>),
    )
)]
pub async fn list_public_settings(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let settings = state.services.settings.list(true).await?;
    Ok(success_response(settings))
}

#[utoipa::path(
    put,
    path = "/api/settings/{key}",
    tag = "settings",
    params(("key" = String, Path, description = "Setting key")),
    request_body = UpdateSettingValue,
    responses(
        (status = 200, description = "Setting updated", body = crate::ApiResponse<system_setting::Model>),
        (status = 400, description = "Value missing", body = crate::errors::ErrorResponse),
        (status = 404, description = "Setting not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn update_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
    AppJson(payload): AppJson<UpdateSettingValue>,
) -> Result<impl IntoResponse, ServiceError> {
    let updated = state
        .services
        .settings
        .update_value(&key, &payload.value)
        .await?;
    Ok(success_response(updated))
}

/// Create a setting or overwrite the existing row with the same key
#[utoipa::path(
    post,
    path = "/api/settings",
    tag = "settings",
    request_body = UpsertSettingRequest,
    responses(
        (status = 201, description = "Setting created or updated", body = crate::ApiResponse<system_setting::Model>),
        (status = 400, description = "Key and value are required", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn upsert_setting(
    State(state): State<AppState>,
    AppJson(payload): AppJson<UpsertSettingRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;
    let saved = state.services.settings.upsert(payload).await?;
    Ok(created_response(saved))
}
