use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};

use crate::{
    auth::{AuthRouterExt, AuthUser, Role},
    entities::sale,
    errors::ServiceError,
    handlers::common::{created_response, success_response, validate_input, AppJson},
    services::sales::{ProcessSaleRequest, SaleReceipt, SaleWithItems},
    AppState,
};

pub fn sale_routes() -> Router<AppState> {
    let history = Router::new().route("/", get(list_sales)).with_auth();

    let till = Router::new()
        .route("/", post(process_sale))
        .route("/:id", get(get_sale))
        .with_roles(&[Role::Admin, Role::Staff]);

    history.merge(till)
}

/// Record a sale and decrement stock atomically
///
/// Either every line is recorded and every item's stock decremented, or
/// nothing is written.
#[utoipa::path(
    post,
    path = "/api/sales",
    tag = "sales",
    request_body = ProcessSaleRequest,
    responses(
        (status = 201, description = "Sale recorded", body = crate::ApiResponse<SaleReceipt>),
        (status = 400, description = "Empty sale, non-positive quantity or negative price", body = crate::errors::ErrorResponse),
        (status = 403, description = "Admin or staff only", body = crate::errors::ErrorResponse),
        (status = 404, description = "A line references an unknown item", body = crate::errors::ErrorResponse),
        (status = 422, description = "Insufficient stock for a line", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn process_sale(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<ProcessSaleRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;
    let receipt = state
        .services
        .sales
        .process_sale(user.user_id, payload)
        .await?;
    Ok(created_response(receipt))
}

/// All sales, newest first
#[utoipa::path(
    get,
    path = "/api/sales",
    tag = "sales",
    responses(
        (status = 200, description = "Sales", body = crate::ApiResponse<Vec<sale::Model>>),
        (status = 401, description = "Missing token", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn list_sales(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let sales = state.services.sales.list_sales().await?;
    Ok(success_response(sales))
}

#[utoipa::path(
    get,
    path = "/api/sales/{id}",
    tag = "sales",
    params(("id" = i32, Path, description = "Sale id")),
    responses(
        (status = 200, description = "Sale with its lines", body = crate::ApiResponse<SaleWithItems>),
        (status = 404, description = "Sale not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn get_sale(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let sale = state.services.sales.get_sale(id).await?;
    Ok(success_response(sale))
}
