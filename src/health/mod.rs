/*!
 * # Health Check Module
 *
 * `GET /api/health` reports whether the service and its database are up.
 * It is exempt from rate limiting and needs no token.
 */

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::AppState;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Up,
    Down,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct HealthInfo {
    pub status: HealthStatus,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub environment: String,
    pub version: String,
    pub database: HealthStatus,
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

/// Service and database status
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthInfo),
        (status = 503, description = "Database unreachable", body = HealthInfo),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = match crate::db::check_connection(&state.db).await {
        Ok(()) => HealthStatus::Up,
        Err(e) => {
            error!(error = %e, "database health check failed");
            HealthStatus::Down
        }
    };

    let (code, message) = match database {
        HealthStatus::Up => (StatusCode::OK, "Bookstore POS API is running"),
        HealthStatus::Down => (StatusCode::SERVICE_UNAVAILABLE, "Database is unreachable"),
    };

    (
        code,
        Json(HealthInfo {
            status: database,
            message: message.to_string(),
            timestamp: Utc::now(),
            environment: state.config.environment.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database,
        }),
    )
}
