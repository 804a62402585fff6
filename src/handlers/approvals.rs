use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};

use crate::{
    auth::{AuthRouterExt, AuthUser, Role},
    entities::approval,
    errors::ServiceError,
    handlers::common::{created_response, message_response, success_response, validate_input, AppJson},
    services::approvals::{CreateApprovalRequest, ReviewApprovalRequest},
    AppState,
};

pub fn approval_routes() -> Router<AppState> {
    let review = Router::new()
        .route("/", get(list_approvals))
        .route("/:id", put(review_approval).delete(delete_approval))
        .with_roles(&[Role::Admin]);

    let request = Router::new()
        .route("/", post(create_approval))
        .with_roles(&[Role::Admin, Role::Staff]);

    review.merge(request)
}

#[utoipa::path(
    get,
    path = "/api/approvals",
    tag = "approvals",
    responses(
        (status = 200, description = "Approvals, newest first", body = crate::ApiResponse<Vec<approval::Model>>),
        (status = 403, description = "Admin only", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn list_approvals(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let approvals = state.services.approvals.list().await?;
    Ok(success_response(approvals))
}

/// Stage a change for admin review
#[utoipa::path(
    post,
    path = "/api/approvals",
    tag = "approvals",
    request_body = CreateApprovalRequest,
    responses(
        (status = 201, description = "Approval requested", body = crate::ApiResponse<approval::Model>),
        (status = 400, description = "Type and data are required", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn create_approval(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<CreateApprovalRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;
    let created = state
        .services
        .approvals
        .create(user.user_id, payload)
        .await?;
    Ok(created_response(created))
}

#[utoipa::path(
    put,
    path = "/api/approvals/{id}",
    tag = "approvals",
    params(("id" = i32, Path, description = "Approval id")),
    request_body = ReviewApprovalRequest,
    responses(
        (status = 200, description = "Approval updated", body = crate::ApiResponse<approval::Model>),
        (status = 400, description = "Unknown status", body = crate::errors::ErrorResponse),
        (status = 404, description = "Approval not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn review_approval(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<ReviewApprovalRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let updated = state.services.approvals.review(id, payload).await?;
    Ok(success_response(updated))
}

#[utoipa::path(
    delete,
    path = "/api/approvals/{id}",
    tag = "approvals",
    params(("id" = i32, Path, description = "Approval id")),
    responses(
        (status = 200, description = "Approval deleted", body = crate::ApiResponse<crate::handlers::common::ResourceRef>),
        (status = 404, description = "Approval not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn delete_approval(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.approvals.delete(id).await?;
    Ok(message_response(id, "Approval deleted successfully"))
}
