use chrono::Utc;
use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

use crate::entities::system_setting::{self, DEFAULT_CATEGORY};
use crate::errors::ServiceError;

/// Settings are stored as text; non-string JSON values keep their JSON spelling.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpsertSettingRequest {
    #[validate(length(min = 1, max = 255, message = "Setting key is required"))]
    pub setting_key: String,
    #[schema(value_type = Object)]
    pub setting_value: Value,
    #[serde(default)]
    pub setting_category: Option<String>,
    #[serde(default)]
    pub is_public: Option<bool>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateSettingValue {
    #[schema(value_type = Object)]
    pub value: Value,
}

#[derive(Clone)]
pub struct SettingsService {
    db: Arc<DatabaseConnection>,
}

impl SettingsService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// All settings, or only the public ones, ordered by category then key.
    #[instrument(skip(self))]
    pub async fn list(&self, public_only: bool) -> Result<Vec<system_setting::Model>, ServiceError> {
        let mut query = system_setting::Entity::find();
        if public_only {
            query = query.filter(system_setting::Column::IsPublic.eq(true));
        }
        Ok(query
            .order_by_asc(system_setting::Column::SettingCategory)
            .order_by_asc(system_setting::Column::SettingKey)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, key: &str) -> Result<system_setting::Model, ServiceError> {
        system_setting::Entity::find()
            .filter(system_setting::Column::SettingKey.eq(key))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Setting '{}'", key)))
    }

    /// Changes the value of an existing key.
    #[instrument(skip(self, value))]
    pub async fn update_value(
        &self,
        key: &str,
        value: &Value,
    ) -> Result<system_setting::Model, ServiceError> {
        if value.is_null() {
            return Err(ServiceError::ValidationError(
                "Setting value is required".to_string(),
            ));
        }

        let existing = self.get(key).await?;
        let mut active: system_setting::ActiveModel = existing.into();
        active.setting_value = Set(value_to_text(value));
        active.updated_at = Set(Utc::now());
        let updated = active.update(&*self.db).await?;

        info!(setting_key = key, "setting updated");
        Ok(updated)
    }

    /// Inserts the key or overwrites every field of the existing row.
    #[instrument(skip(self, request), fields(setting_key = %request.setting_key))]
    pub async fn upsert(
        &self,
        request: UpsertSettingRequest,
    ) -> Result<system_setting::Model, ServiceError> {
        if request.setting_value.is_null() {
            return Err(ServiceError::ValidationError(
                "Setting key and value are required".to_string(),
            ));
        }

        let now = Utc::now();
        let row = system_setting::ActiveModel {
            setting_key: Set(request.setting_key.clone()),
            setting_value: Set(value_to_text(&request.setting_value)),
            setting_category: Set(request
                .setting_category
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string())),
            is_public: Set(request.is_public.unwrap_or(false)),
            description: Set(request.description.unwrap_or_default()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        system_setting::Entity::insert(row)
            .on_conflict(
                OnConflict::column(system_setting::Column::SettingKey)
                    .update_columns([
                        system_setting::Column::SettingValue,
                        system_setting::Column::SettingCategory,
                        system_setting::Column::IsPublic,
                        system_setting::Column::Description,
                        system_setting::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&*self.db)
            .await?;

        self.get(&request.setting_key).await
    }
}
