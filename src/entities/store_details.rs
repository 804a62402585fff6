use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_STORE_NAME: &str = "Bookstore";

/// Primary key of the only row the table ever holds.
pub const STORE_DETAILS_ID: i32 = 1;

/// Single-row table holding receipt and storefront details.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "store_details")]
#[schema(as = StoreDetails)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub contact: String,
    pub website: String,
    pub address: String,
    pub fax: String,
    pub email: String,
    pub tax_number: String,
    pub receipt_footer: String,
    pub logo: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
