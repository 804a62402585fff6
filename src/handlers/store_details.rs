use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, put},
    Router,
};

use crate::{
    auth::{AuthRouterExt, Role},
    entities::store_details,
    errors::ServiceError,
    handlers::common::{success_response, validate_input, AppJson},
    services::store_details::StoreDetailsInput,
    AppState,
};

pub fn store_details_routes() -> Router<AppState> {
    let admin = Router::new()
        .route("/", put(update_store_details))
        .with_roles(&[Role::Admin]);

    Router::new().route("/", get(get_store_details)).merge(admin)
}

/// Store profile; created with defaults on first read
#[utoipa::path(
    get,
    path = "/api/store-details",
    tag = "store",
    responses(
        (status = 200, description = "Store details", body = crate::ApiResponse<store_details::Model>),
    )
)]
pub async fn get_store_details(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let store = state.services.store_details.get_or_create().await?;
    Ok(success_response(store))
}

#[utoipa::path(
    put,
    path = "/api/store-details",
    tag = "store",
    request_body = StoreDetailsInput,
    responses(
        (status = 200, description = "Store details saved", body = crate::ApiResponse<store_details::Model>),
        (status = 400, description = "Store name is required", body = crate::errors::ErrorResponse),
        (status = 403, description = "Admin only", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn update_store_details(
    State(state): State<AppState>,
    AppJson(payload): AppJson<StoreDetailsInput>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;
    let saved = state.services.store_details.upsert(payload).await?;
    Ok(success_response(saved))
}
