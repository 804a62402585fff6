/*!
 * # Authentication and Authorization Module
 *
 * Staff log in with a username and password and receive an HS256 access token.
 * The token carries the user's role and the permissions derived from it.
 *
 * - [`auth_middleware`] validates the bearer token and inserts an [`AuthUser`]
 *   into the request extensions.
 * - [`roles_middleware`] rejects users whose role is not in the route's list.
 * - [`AuthRouterExt`] wires both onto a router.
 *
 * Status codes: a missing token is 401, an invalid or expired token is 403 and
 * a role outside the allowed list is 403.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::entities::user;
use crate::errors::ServiceError;

mod password;
mod permissions;
mod rbac;
mod types;

pub use password::{hash_password, verify_password};
pub use permissions::consts;
pub use rbac::*;
pub use types::*;

/// Claim structure for access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub username: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub permissions: Vec<String>,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
    pub nbf: i64,
    pub iss: String,
    pub aud: String,
}

/// Authenticated user data extracted from the access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: i32,
    pub username: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub permissions: Vec<String>,
    pub token_id: String,
}

impl AuthUser {
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}

/// Reads the user inserted by [`auth_middleware`]; routes without the middleware get 401.
#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AuthError::MissingToken)
    }
}

impl TryFrom<Claims> for AuthUser {
    type Error = AuthError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let user_id = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;
        let role = claims.role.parse().map_err(|_| AuthError::InvalidToken)?;
        Ok(Self {
            user_id,
            username: claims.username,
            name: claims.name,
            email: claims.email,
            role,
            permissions: claims.permissions,
            token_id: claims.jti,
        })
    }
}

/// Authentication configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_audience: String,
    pub jwt_issuer: String,
    pub access_token_expiration: Duration,
}

impl AuthConfig {
    pub fn new(
        jwt_secret: String,
        jwt_audience: String,
        jwt_issuer: String,
        access_token_expiration: Duration,
    ) -> Self {
        Self {
            jwt_secret,
            jwt_audience,
            jwt_issuer,
            access_token_expiration,
        }
    }
}

impl From<&AppConfig> for AuthConfig {
    fn from(cfg: &AppConfig) -> Self {
        Self::new(
            cfg.jwt_secret.clone(),
            cfg.auth_audience.clone(),
            cfg.auth_issuer.clone(),
            Duration::from_secs(cfg.jwt_expiration_secs),
        )
    }
}

/// Issues and validates tokens and owns the credential operations on users.
#[derive(Debug, Clone)]
pub struct AuthService {
    pub config: AuthConfig,
    pub db: Arc<DatabaseConnection>,
}

impl AuthService {
    pub fn new(config: AuthConfig, db: Arc<DatabaseConnection>) -> Self {
        Self { config, db }
    }

    /// Signs an access token for `user`.
    pub fn issue_token(&self, user: &user::Model) -> Result<String, AuthError> {
        let role: Role = user
            .role
            .parse()
            .map_err(|_| AuthError::InternalError(format!("unknown role '{}'", user.role)))?;

        let now = Utc::now();
        let exp = now
            + ChronoDuration::from_std(self.config.access_token_expiration)
                .map_err(|_| AuthError::InternalError("Invalid token duration".to_string()))?;

        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: role.to_string(),
            permissions: role.permissions(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            nbf: now.timestamp(),
            iss: self.config.jwt_issuer.clone(),
            aud: self.config.jwt_audience.clone(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenCreation(e.to_string()))
    }

    /// Validates signature, expiry, issuer and audience.
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.config.jwt_issuer.as_str()]);
        validation.set_audience(&[self.config.jwt_audience.as_str()]);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })
    }

    /// Checks credentials of an active user, records the login time and issues a token.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, AuthError> {
        let user = user::Entity::find()
            .filter(user::Column::Username.eq(request.username.as_str()))
            .filter(user::Column::IsActive.eq(true))
            .one(&*self.db)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let matches = verify_password(&request.password, &user.password_hash).unwrap_or_else(|e| {
            warn!(user_id = user.id, error = %e, "stored password hash could not be parsed");
            false
        });
        if !matches {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.issue_token(&user)?;

        let mut active: user::ActiveModel = user.into();
        active.last_login = Set(Some(Utc::now()));
        let user = active.update(&*self.db).await?;

        info!(user_id = user.id, role = %user.role, "user logged in");
        Ok(LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.config.access_token_expiration.as_secs(),
            user: user.into(),
        })
    }

    #[instrument(skip(self))]
    pub async fn profile(&self, user_id: i32) -> Result<UserProfile, AuthError> {
        user::Entity::find_by_id(user_id)
            .one(&*self.db)
            .await?
            .map(UserProfile::from)
            .ok_or(AuthError::UserNotFound)
    }

    #[instrument(skip(self, request))]
    pub async fn change_password(
        &self,
        user_id: i32,
        request: &ChangePasswordRequest,
    ) -> Result<(), AuthError> {
        let user = user::Entity::find_by_id(user_id)
            .one(&*self.db)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !verify_password(&request.current_password, &user.password_hash)? {
            return Err(AuthError::WrongPassword);
        }

        let new_hash = hash_password(&request.new_password)?;
        let mut active: user::ActiveModel = user.into();
        active.password_hash = Set(new_hash);
        active.updated_at = Set(Utc::now());
        active.update(&*self.db).await?;

        info!(user_id, "password changed");
        Ok(())
    }
}

/// Authentication error types
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Access token required")]
    MissingToken,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Current password is incorrect")]
    WrongPassword,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Invalid or expired token")]
    TokenExpired,

    #[error("Token creation failed: {0}")]
    TokenCreation(String),

    #[error("User not found")]
    UserNotFound,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<AuthError> for ServiceError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken
            | AuthError::InvalidCredentials
            | AuthError::WrongPassword => ServiceError::Unauthorized(err.to_string()),
            AuthError::InvalidToken | AuthError::TokenExpired => {
                ServiceError::InvalidToken(err.to_string())
            }
            AuthError::InsufficientPermissions => ServiceError::Forbidden(err.to_string()),
            AuthError::UserNotFound => ServiceError::NotFound("User".to_string()),
            AuthError::DatabaseError(db) => ServiceError::DatabaseError(db),
            AuthError::TokenCreation(msg) | AuthError::InternalError(msg) => {
                ServiceError::InternalError(msg)
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ServiceError::from(self).into_response()
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Validates the bearer token and inserts the resulting [`AuthUser`].
/// Expects an `Arc<AuthService>` in the request extensions.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let auth_service = match request.extensions().get::<Arc<AuthService>>() {
        Some(service) => service.clone(),
        None => {
            return AuthError::InternalError("Authentication service not available".to_string())
                .into_response();
        }
    };

    let Some(token) = bearer_token(request.headers()) else {
        return AuthError::MissingToken.into_response();
    };

    let user = auth_service
        .validate_token(token)
        .and_then(AuthUser::try_from);

    match user {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

/// Rejects authenticated users whose role is not in the allowed list.
pub async fn roles_middleware(
    State(allowed): State<Arc<[Role]>>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or(AuthError::MissingToken)?;

    if !user.has_any_role(&allowed) {
        warn!(
            user_id = user.user_id,
            role = %user.role,
            path = %request.uri().path(),
            "role not permitted for route"
        );
        return Err(AuthError::InsufficientPermissions);
    }

    Ok(next.run(request).await)
}

/// Extension methods for Router to add auth middleware
pub trait AuthRouterExt {
    fn with_auth(self) -> Self;
    fn with_roles(self, roles: &[Role]) -> Self;
}

impl<S> AuthRouterExt for axum::Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_auth(self) -> Self {
        self.layer(axum::middleware::from_fn(auth_middleware))
    }

    fn with_roles(self, roles: &[Role]) -> Self {
        let allowed: Arc<[Role]> = Arc::from(roles);
        self.layer(axum::middleware::from_fn_with_state(
            allowed,
            roles_middleware,
        ))
        .with_auth()
    }
}
