#![forbid(unsafe_code)]

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod middleware_helpers;
pub mod migrator;
pub mod openapi;
pub mod rate_limiter;
pub mod services;
pub mod tracing;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::HeaderValue,
    response::Json,
    routing::get,
    Extension, Router,
};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowHeaders, AllowMethods, CorsLayer},
};
use utoipa::ToSchema;

use crate::auth::{AuthConfig, AuthService};
use crate::handlers::AppServices;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub auth: Arc<AuthService>,
    pub services: AppServices,
    pub rate_limit: rate_limiter::RateLimitLayer,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let auth = Arc::new(AuthService::new(AuthConfig::from(&config), db.clone()));
        Self {
            services: AppServices::new(db.clone()),
            rate_limit: rate_limiter::RateLimitLayer::from_config(&config),
            db,
            config,
            auth,
        }
    }
}

// Common response wrappers
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Serialize, ToSchema)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            request_id: crate::tracing::current_request_id().map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn validation_errors(errors: Vec<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some("Validation failed".to_string()),
            errors: Some(errors),
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}


/// Every resource router, mounted under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", handlers::auth::auth_routes())
        .nest("/users", handlers::users::user_routes())
        .nest("/categories", handlers::categories::category_routes())
        .nest("/items", handlers::items::item_routes())
        .nest("/sales", handlers::sales::sale_routes())
        .nest("/approvals", handlers::approvals::approval_routes())
        .nest("/settings", handlers::settings::settings_routes())
        .nest("/store-details", handlers::store_details::store_details_routes())
        .nest("/reports", handlers::reports::report_routes())
        .nest("/health", health::health_routes())
}

async fn service_info(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "name": "Bookstore POS API",
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.config.environment,
        "endpoints": {
            "auth": "/api/auth",
            "users": "/api/users",
            "categories": "/api/categories",
            "items": "/api/items",
            "sales": "/api/sales",
            "approvals": "/api/approvals",
            "settings": "/api/settings",
            "store_details": "/api/store-details",
            "reports": "/api/reports",
            "health": "/api/health",
            "docs": "/swagger-ui"
        }
    }))
}

/// CORS from config: explicit origins when set, permissive otherwise.
/// Production without origins is rejected by config validation before this runs.
pub fn cors_layer(cfg: &config::AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cfg
        .cors_allowed_origins
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if origins.is_empty() {
        ::tracing::info!("using permissive CORS; no explicit origins configured");
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request())
            .allow_credentials(cfg.cors_allow_credentials)
    }
}

/// Full application router with the middleware stack applied.
///
/// Layers run outermost first: rate limiting, request id, tracing, security
/// headers, CORS, compression, body limit, then auth where a route asks for it.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(service_info))
        .nest("/api", api_routes())
        .merge(openapi::swagger_ui())
        .layer(DefaultBodyLimit::max(state.config.max_body_size))
        .layer(Extension(state.auth.clone()))
        .layer(CompressionLayer::new())
        .layer(cors_layer(&state.config))
        .layer(axum::middleware::from_fn(
            middleware_helpers::security_headers_middleware,
        ))
        .layer(crate::tracing::configure_http_tracing())
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id_middleware,
        ))
        .layer(state.rate_limit.clone())
        .with_state(state)
}
