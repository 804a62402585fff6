use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

use crate::entities::category::{self, DEFAULT_COLOR};
use crate::entities::item;
use crate::errors::ServiceError;

/// Body for both create and full update.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CategoryInput {
    #[validate(length(min = 1, max = 255, message = "Category name is required"))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl CategoryInput {
    fn color_or_default(&self) -> String {
        self.color
            .clone()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_COLOR.to_string())
    }
}

#[derive(Clone)]
pub struct CategoryService {
    db: Arc<DatabaseConnection>,
}

impl CategoryService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Active categories ordered by name.
    #[instrument(skip(self))]
    pub async fn list_active(&self) -> Result<Vec<category::Model>, ServiceError> {
        Ok(category::Entity::find()
            .filter(category::Column::IsActive.eq(true))
            .order_by_asc(category::Column::Name)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn find_by_name(&self, name: &str) -> Result<Option<category::Model>, ServiceError> {
        Ok(category::Entity::find()
            .filter(category::Column::Name.eq(name))
            .one(&*self.db)
            .await?)
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: CategoryInput) -> Result<category::Model, ServiceError> {
        if self.find_by_name(&input.name).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Category '{}' already exists",
                input.name
            )));
        }

        let now = Utc::now();
        let created = category::ActiveModel {
            color: Set(input.color_or_default()),
            name: Set(input.name),
            description: Set(input.description.unwrap_or_default()),
            is_active: Set(input.is_active.unwrap_or(true)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(category_id = created.id, "category created");
        Ok(created)
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i32,
        input: CategoryInput,
    ) -> Result<category::Model, ServiceError> {
        let existing = category::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Category {}", id)))?;

        if let Some(other) = self.find_by_name(&input.name).await? {
            if other.id != id {
                return Err(ServiceError::Conflict(format!(
                    "Category '{}' already exists",
                    input.name
                )));
            }
        }

        let color = input.color_or_default();
        let mut active: category::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.description = Set(input.description.unwrap_or_default());
        active.color = Set(color);
        active.is_active = Set(input.is_active.unwrap_or(true));
        active.updated_at = Set(Utc::now());

        Ok(active.update(&*self.db).await?)
    }

    /// Items in the category survive with `category_id` cleared.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let existing = category::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Category {}", id)))?;

        let txn = self.db.begin().await?;
        let detached = item::Entity::update_many()
            .col_expr(item::Column::CategoryId, Expr::value(Option::<i32>::None))
            .filter(item::Column::CategoryId.eq(id))
            .exec(&txn)
            .await?;
        existing.delete(&txn).await?;
        txn.commit().await?;

        info!(
            category_id = id,
            detached_items = detached.rows_affected,
            "category deleted"
        );
        Ok(())
    }
}
