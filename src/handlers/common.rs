use crate::errors::ServiceError;
use crate::ApiResponse;
use axum::{
    extract::FromRequest,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// JSON body extractor whose rejections use the standard error body (400).
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ServiceError))]
pub struct AppJson<T>(pub T);

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
}

/// Standard created response
pub fn created_response<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, Json(ApiResponse::success(data))).into_response()
}

/// Success envelope carrying only a message, plus the affected id
pub fn message_response(id: impl Into<ResourceRef>, message: &str) -> Response {
    let mut body = ApiResponse::success(id.into());
    body.message = Some(message.to_string());
    (StatusCode::OK, Json(body)).into_response()
}

/// Validate request input
pub fn validate_input<T: Validate>(input: &T) -> Result<(), ServiceError> {
    input.validate().map_err(ServiceError::from)
}

/// Identifier of the resource an action touched.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ResourceRef {
    Id { id: i32 },
    Key { key: String },
}

impl From<i32> for ResourceRef {
    fn from(id: i32) -> Self {
        ResourceRef::Id { id }
    }
}

impl From<&str> for ResourceRef {
    fn from(key: &str) -> Self {
        ResourceRef::Key {
            key: key.to_string(),
        }
    }
}
