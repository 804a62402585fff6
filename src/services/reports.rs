use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, instrument};
use utoipa::ToSchema;

use crate::entities::{category, item, sale, sale_item};
use crate::errors::ServiceError;
use crate::services::items::ItemWithCategory;

pub const DAILY_SALES_DAYS: usize = 30;
pub const TOP_SELLING_LIMIT: u64 = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DailySalesRow {
    pub sale_date: NaiveDate,
    pub total_transactions: i64,
    #[schema(value_type = String)]
    pub total_revenue: Decimal,
    pub total_items_sold: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TopSellingRow {
    pub item_id: i32,
    pub item_name: String,
    pub total_sold: i64,
    #[schema(value_type = String)]
    pub total_revenue: Decimal,
}

/// Buckets sales by calendar day (UTC) and keeps the `days` most recent days, newest first.
pub fn summarize_daily(
    sales: &[sale::Model],
    items_per_sale: &HashMap<i32, i64>,
    days: usize,
) -> Vec<DailySalesRow> {
    let mut by_day: BTreeMap<NaiveDate, DailySalesRow> = BTreeMap::new();
    for s in sales {
        let day = s.created_at.date_naive();
        let row = by_day.entry(day).or_insert_with(|| DailySalesRow {
            sale_date: day,
            total_transactions: 0,
            total_revenue: Decimal::ZERO,
            total_items_sold: 0,
        });
        row.total_transactions += 1;
        row.total_revenue += s.total_amount;
        row.total_items_sold += items_per_sale.get(&s.id).copied().unwrap_or(0);
    }
    by_day.into_values().rev().take(days).collect()
}

/// Read-only aggregates for the back office.
#[derive(Clone)]
pub struct ReportService {
    db: Arc<DatabaseConnection>,
}

impl ReportService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Start of the oldest day among the most recent `DAILY_SALES_DAYS` days
    /// with sales. One indexed lookup per day walks back from the newest sale.
    async fn daily_window_start(&self) -> Result<Option<DateTime<Utc>>, ServiceError> {
        let mut window_start = None;
        for _ in 0..DAILY_SALES_DAYS {
            let mut query = sale::Entity::find().order_by_desc(sale::Column::CreatedAt);
            if let Some(before) = window_start {
                query = query.filter(sale::Column::CreatedAt.lt(before));
            }
            let Some(latest) = query.one(&*self.db).await? else {
                break;
            };
            window_start = Some(latest.created_at.date_naive().and_time(NaiveTime::MIN).and_utc());
        }
        Ok(window_start)
    }

    #[instrument(skip(self))]
    pub async fn daily_sales(&self) -> Result<Vec<DailySalesRow>, ServiceError> {
        let Some(window_start) = self.daily_window_start().await? else {
            return Ok(Vec::new());
        };

        let sales = sale::Entity::find()
            .filter(sale::Column::CreatedAt.gte(window_start))
            .order_by_desc(sale::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        let sale_ids: Vec<i32> = sales.iter().map(|s| s.id).collect();
        let items_per_sale: HashMap<i32, i64> = if sale_ids.is_empty() {
            HashMap::new()
        } else {
            sale_item::Entity::find()
                .select_only()
                .column(sale_item::Column::SaleId)
                .column_as(sale_item::Column::Quantity.sum(), "items_sold")
                .filter(sale_item::Column::SaleId.is_in(sale_ids))
                .group_by(sale_item::Column::SaleId)
                .into_tuple::<(i32, i64)>()
                .all(&*self.db)
                .await?
                .into_iter()
                .collect()
        };

        let rows = summarize_daily(&sales, &items_per_sale, DAILY_SALES_DAYS);
        debug!(days = rows.len(), "daily sales summarized");
        Ok(rows)
    }

    #[instrument(skip(self))]
    pub async fn top_selling(&self) -> Result<Vec<TopSellingRow>, ServiceError> {
        let totals = sale_item::Entity::find()
            .select_only()
            .column(sale_item::Column::ItemId)
            .column_as(sale_item::Column::Quantity.sum(), "total_sold")
            .column_as(sale_item::Column::LineTotal.sum(), "total_revenue")
            .group_by(sale_item::Column::ItemId)
            .order_by_desc(sale_item::Column::Quantity.sum())
            .order_by_asc(sale_item::Column::ItemId)
            .limit(TOP_SELLING_LIMIT)
            .into_tuple::<(i32, i64, Decimal)>()
            .all(&*self.db)
            .await?;

        let item_ids: Vec<i32> = totals.iter().map(|(id, _, _)| *id).collect();
        let names: HashMap<i32, String> = if item_ids.is_empty() {
            HashMap::new()
        } else {
            item::Entity::find()
                .filter(item::Column::Id.is_in(item_ids))
                .all(&*self.db)
                .await?
                .into_iter()
                .map(|i| (i.id, i.name))
                .collect()
        };

        Ok(totals
            .into_iter()
            .map(|(item_id, total_sold, total_revenue)| TopSellingRow {
                item_id,
                item_name: names.get(&item_id).cloned().unwrap_or_default(),
                total_sold,
                total_revenue,
            })
            .collect())
    }

    /// Active items at or below their own reorder point.
    #[instrument(skip(self))]
    pub async fn low_stock(&self) -> Result<Vec<ItemWithCategory>, ServiceError> {
        let rows = item::Entity::find()
            .find_also_related(category::Entity)
            .filter(item::Column::IsActive.eq(true))
            .filter(
                Expr::col((item::Entity, item::Column::StockQuantity))
                    .lte(Expr::col((item::Entity, item::Column::MinStockLevel))),
            )
            .order_by_asc(item::Column::StockQuantity)
            .order_by_asc(item::Column::Name)
            .all(&*self.db)
            .await?;
        Ok(rows.into_iter().map(ItemWithCategory::from).collect())
    }
}
