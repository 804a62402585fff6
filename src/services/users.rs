use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::{hash_password, Role, UserProfile};
use crate::entities::user;
use crate::errors::ServiceError;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    /// One of `admin`, `staff`, `manager`
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub is_active: Option<bool>,
}

fn parse_role(role: &str) -> Result<Role, ServiceError> {
    role.parse()
        .map_err(|_| ServiceError::BadRequest(format!("Invalid role '{}'", role)))
}

/// Admin-side user management. Credentials for the current user live in `AuthService`.
#[derive(Clone)]
pub struct UserService {
    db: Arc<DatabaseConnection>,
}

impl UserService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<UserProfile>, ServiceError> {
        let users = user::Entity::find()
            .order_by_asc(user::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(users.into_iter().map(UserProfile::from).collect())
    }

    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn create(&self, request: CreateUserRequest) -> Result<UserProfile, ServiceError> {
        let role = parse_role(&request.role)?;

        let taken = user::Entity::find()
            .filter(user::Column::Username.eq(request.username.as_str()))
            .one(&*self.db)
            .await?
            .is_some();
        if taken {
            return Err(ServiceError::Conflict(format!(
                "Username '{}' is already taken",
                request.username
            )));
        }

        let password_hash = hash_password(&request.password)?;
        let now = Utc::now();
        let created = user::ActiveModel {
            username: Set(request.username),
            password_hash: Set(password_hash),
            name: Set(request.name),
            email: Set(request.email),
            role: Set(role.to_string()),
            is_active: Set(true),
            last_login: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(user_id = created.id, role = %role, "user created");
        Ok(created.into())
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: i32,
        request: UpdateUserRequest,
    ) -> Result<UserProfile, ServiceError> {
        let role = parse_role(&request.role)?;
        let existing = user::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User {}", id)))?;

        let mut active: user::ActiveModel = existing.into();
        active.name = Set(request.name);
        active.email = Set(request.email);
        active.role = Set(role.to_string());
        active.is_active = Set(request.is_active.unwrap_or(true));
        active.updated_at = Set(Utc::now());

        Ok(active.update(&*self.db).await?.into())
    }

    /// Sales and approvals owned by the user keep existing with the owner cleared.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let existing = user::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User {}", id)))?;

        existing.delete(&*self.db).await?;
        info!(user_id = id, "user deleted");
        Ok(())
    }
}
