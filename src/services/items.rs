use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::entities::{
    category,
    item::{self, DEFAULT_MIN_STOCK_LEVEL},
    sale_item,
};
use crate::errors::ServiceError;

/// Upper bound for inline (base64) item images.
pub const MAX_IMAGE_URL_LEN: usize = 10 * 1024 * 1024;

/// A category given either by id or by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum CategoryRef {
    Id(i32),
    Name(String),
}

fn validate_money(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(ValidationError::new("negative_amount"));
    }
    Ok(())
}

/// Body for item create and full update.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ItemInput {
    #[validate(length(min = 1, max = 255, message = "Item name is required"))]
    pub name: String,
    pub category: CategoryRef,
    #[serde(default)]
    pub description: Option<String>,
    #[validate(custom = "validate_money")]
    #[schema(value_type = String, example = "12.50")]
    pub price: Decimal,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "7.25")]
    pub cost_price: Option<Decimal>,
    #[validate(range(min = 0, message = "Stock quantity cannot be negative"))]
    pub stock_quantity: i32,
    #[serde(default)]
    pub min_stock_level: Option<i32>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub supplier_id: Option<i32>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Ignored on create
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl ItemInput {
    fn check_image(&self) -> Result<(), ServiceError> {
        match &self.image_url {
            Some(url) if url.len() > MAX_IMAGE_URL_LEN => Err(ServiceError::BadRequest(
                "Image file is too large".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// Item row plus the name of its category.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ItemWithCategory {
    #[serde(flatten)]
    pub item: item::Model,
    pub category: Option<String>,
}

impl From<(item::Model, Option<category::Model>)> for ItemWithCategory {
    fn from((item, category): (item::Model, Option<category::Model>)) -> Self {
        Self {
            item,
            category: category.map(|c| c.name),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Clone)]
pub struct ItemService {
    db: Arc<DatabaseConnection>,
}

impl ItemService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// All items ordered by name.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<ItemWithCategory>, ServiceError> {
        let rows = item::Entity::find()
            .find_also_related(category::Entity)
            .order_by_asc(item::Column::Name)
            .order_by_asc(item::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(rows.into_iter().map(ItemWithCategory::from).collect())
    }

    /// Active items at or below `threshold`, lowest stock first.
    #[instrument(skip(self))]
    pub async fn low_stock(&self, threshold: i32) -> Result<Vec<ItemWithCategory>, ServiceError> {
        let rows = item::Entity::find()
            .find_also_related(category::Entity)
            .filter(item::Column::IsActive.eq(true))
            .filter(item::Column::StockQuantity.lte(threshold))
            .order_by_asc(item::Column::StockQuantity)
            .order_by_asc(item::Column::Name)
            .all(&*self.db)
            .await?;
        Ok(rows.into_iter().map(ItemWithCategory::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<ItemWithCategory, ServiceError> {
        item::Entity::find_by_id(id)
            .find_also_related(category::Entity)
            .one(&*self.db)
            .await?
            .map(ItemWithCategory::from)
            .ok_or_else(|| ServiceError::NotFound(format!("Item {}", id)))
    }

    async fn resolve_category(&self, category: &CategoryRef) -> Result<i32, ServiceError> {
        let found = match category {
            CategoryRef::Id(id) => category::Entity::find_by_id(*id).one(&*self.db).await?,
            CategoryRef::Name(name) => {
                category::Entity::find()
                    .filter(category::Column::Name.eq(name.as_str()))
                    .one(&*self.db)
                    .await?
            }
        };
        found
            .map(|c| c.id)
            .ok_or_else(|| ServiceError::BadRequest("Invalid category".to_string()))
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: ItemInput) -> Result<ItemWithCategory, ServiceError> {
        input.check_image()?;
        let category_id = self.resolve_category(&input.category).await?;

        let now = Utc::now();
        let created = item::ActiveModel {
            name: Set(input.name),
            description: Set(input.description.unwrap_or_default()),
            price: Set(input.price),
            cost_price: Set(input.cost_price),
            stock_quantity: Set(input.stock_quantity),
            min_stock_level: Set(input.min_stock_level.unwrap_or(DEFAULT_MIN_STOCK_LEVEL)),
            category_id: Set(Some(category_id)),
            sku: Set(non_empty(input.sku)),
            barcode: Set(non_empty(input.barcode)),
            supplier_id: Set(input.supplier_id),
            image_url: Set(input.image_url.unwrap_or_default()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(item_id = created.id, category_id, "item created");
        self.get(created.id).await
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i32, input: ItemInput) -> Result<ItemWithCategory, ServiceError> {
        input.check_image()?;

        let existing = item::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Item {}", id)))?;
        let category_id = self.resolve_category(&input.category).await?;

        let mut active: item::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.description = Set(input.description.unwrap_or_default());
        active.price = Set(input.price);
        active.cost_price = Set(input.cost_price);
        active.stock_quantity = Set(input.stock_quantity);
        active.min_stock_level = Set(input.min_stock_level.unwrap_or(DEFAULT_MIN_STOCK_LEVEL));
        active.category_id = Set(Some(category_id));
        active.sku = Set(non_empty(input.sku));
        active.barcode = Set(non_empty(input.barcode));
        active.supplier_id = Set(input.supplier_id);
        active.image_url = Set(input.image_url.unwrap_or_default());
        active.is_active = Set(input.is_active.unwrap_or(true));
        active.updated_at = Set(Utc::now());
        active.update(&*self.db).await?;

        self.get(id).await
    }

    /// Items that appear on recorded sales cannot be removed.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let existing = item::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Item {}", id)))?;

        let sold = sale_item::Entity::find()
            .filter(sale_item::Column::ItemId.eq(id))
            .count(&*self.db)
            .await?;
        if sold > 0 {
            return Err(ServiceError::Conflict(format!(
                "Item {} appears on {} sale line(s); deactivate it instead",
                id, sold
            )));
        }

        existing.delete(&*self.db).await?;
        info!(item_id = id, "item deleted");
        Ok(())
    }
}
