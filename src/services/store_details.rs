use chrono::Utc;
use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

use crate::entities::store_details::{self, DEFAULT_STORE_NAME, STORE_DETAILS_ID};
use crate::errors::ServiceError;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct StoreDetailsInput {
    #[validate(length(min = 1, message = "Store name is required"))]
    pub name: String,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub fax: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub tax_number: Option<String>,
    #[serde(default)]
    pub receipt_footer: Option<String>,
    /// Logo as URL or data URI
    #[serde(default)]
    pub logo: Option<String>,
}

impl StoreDetailsInput {
    fn apply(self, active: &mut store_details::ActiveModel) {
        active.name = Set(self.name);
        active.contact = Set(self.contact.unwrap_or_default());
        active.website = Set(self.website.unwrap_or_default());
        active.address = Set(self.address.unwrap_or_default());
        active.fax = Set(self.fax.unwrap_or_default());
        active.email = Set(self.email.unwrap_or_default());
        active.tax_number = Set(self.tax_number.unwrap_or_default());
        active.receipt_footer = Set(self.receipt_footer.unwrap_or_default());
        active.logo = Set(self.logo.unwrap_or_default());
        active.updated_at = Set(Utc::now());
    }
}

/// Singleton store profile printed on receipts.
#[derive(Clone)]
pub struct StoreDetailsService {
    db: Arc<DatabaseConnection>,
}

impl StoreDetailsService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Inserts the default row unless one already exists. Safe to race: the
    /// fixed key turns a second insert into a no-op.
    async fn ensure_row<C: ConnectionTrait>(conn: &C) -> Result<bool, ServiceError> {
        let mut active = store_details::ActiveModel {
            id: Set(STORE_DETAILS_ID),
            ..Default::default()
        };
        StoreDetailsInput {
            name: DEFAULT_STORE_NAME.to_string(),
            ..Default::default()
        }
        .apply(&mut active);

        let inserted = store_details::Entity::insert(active)
            .on_conflict(
                OnConflict::column(store_details::Column::Id)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await?;
        Ok(inserted > 0)
    }

    async fn load(&self) -> Result<store_details::Model, ServiceError> {
        store_details::Entity::find_by_id(STORE_DETAILS_ID)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::InternalError("store details row missing".to_string()))
    }

    /// Returns the store row, creating the default one on first read.
    #[instrument(skip(self))]
    pub async fn get_or_create(&self) -> Result<store_details::Model, ServiceError> {
        if let Some(existing) = store_details::Entity::find_by_id(STORE_DETAILS_ID)
            .one(&*self.db)
            .await?
        {
            return Ok(existing);
        }

        if Self::ensure_row(&*self.db).await? {
            info!(store_id = STORE_DETAILS_ID, "default store details created");
        }
        self.load().await
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn upsert(
        &self,
        input: StoreDetailsInput,
    ) -> Result<store_details::Model, ServiceError> {
        Self::ensure_row(&*self.db).await?;

        let mut active: store_details::ActiveModel = self.load().await?.into();
        input.apply(&mut active);
        let saved = active.update(&*self.db).await?;

        info!(store_id = saved.id, "store details saved");
        Ok(saved)
    }
}
