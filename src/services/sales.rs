use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::entities::{item, sale, sale_item};
use crate::errors::ServiceError;

/// One line of a sale as submitted by the till.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SaleLineInput {
    pub item_id: i32,
    /// Units sold, must be positive
    pub quantity: i32,
    /// Price charged per unit, taken as given
    #[schema(value_type = String, example = "12.50")]
    pub unit_price: Decimal,
}

/// Largest amount a `NUMERIC(12,2)` money column holds.
pub const MAX_MONEY: Decimal = dec!(9999999999.99);

/// Money columns keep two decimal places.
pub const MONEY_SCALE: u32 = 2;

impl SaleLineInput {
    /// `quantity * unit_price`, rejected when it does not fit a money column.
    pub fn line_total(&self) -> Result<Decimal, ServiceError> {
        Decimal::from(self.quantity)
            .checked_mul(self.unit_price)
            .filter(|total| *total <= MAX_MONEY)
            .ok_or_else(|| {
                ServiceError::ValidationError(format!(
                    "Line total for item {} exceeds {}",
                    self.item_id, MAX_MONEY
                ))
            })
    }
}

/// Sum of every line total, with the same bound as a single line.
pub fn sale_total(lines: &[SaleLineInput]) -> Result<Decimal, ServiceError> {
    lines.iter().try_fold(Decimal::ZERO, |acc, line| {
        acc.checked_add(line.line_total()?)
            .filter(|total| *total <= MAX_MONEY)
            .ok_or_else(|| {
                ServiceError::ValidationError(format!("Sale total exceeds {}", MAX_MONEY))
            })
    })
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProcessSaleRequest {
    #[validate(length(min = 1, message = "Sale must contain at least one item"))]
    pub items: Vec<SaleLineInput>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Outcome of a committed sale.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SaleReceipt {
    pub sale_id: i32,
    pub sale_number: String,
    #[schema(value_type = String, example = "37.50")]
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SaleWithItems {
    pub sale: sale::Model,
    pub items: Vec<sale_item::Model>,
}

const DEFAULT_PAYMENT_METHOD: &str = "cash";

/// `SALE-YYYYMMDD-XXXXXXXX` with an uppercase hex suffix from a v4 UUID.
pub fn generate_sale_number(at: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string()[..8].to_uppercase();
    format!("SALE-{}-{}", at.format("%Y%m%d"), suffix)
}

/// Rejects requests that must never reach the database.
pub fn validate_lines(lines: &[SaleLineInput]) -> Result<(), ServiceError> {
    if lines.is_empty() {
        return Err(ServiceError::ValidationError(
            "Sale must contain at least one item".to_string(),
        ));
    }
    for (idx, line) in lines.iter().enumerate() {
        if line.quantity <= 0 {
            return Err(ServiceError::ValidationError(format!(
                "Line {}: quantity must be greater than zero",
                idx + 1
            )));
        }
        if line.unit_price < Decimal::ZERO {
            return Err(ServiceError::ValidationError(format!(
                "Line {}: unit price cannot be negative",
                idx + 1
            )));
        }
        if line.unit_price > MAX_MONEY {
            return Err(ServiceError::ValidationError(format!(
                "Line {}: unit price cannot exceed {}",
                idx + 1,
                MAX_MONEY
            )));
        }
        if line.unit_price.normalize().scale() > MONEY_SCALE {
            return Err(ServiceError::ValidationError(format!(
                "Line {}: unit price has more than {} decimal places",
                idx + 1,
                MONEY_SCALE
            )));
        }
    }
    Ok(())
}

/// Records sales against stock.
#[derive(Clone)]
pub struct SaleService {
    db: Arc<DatabaseConnection>,
}

impl SaleService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Inserts the sale, its lines and the stock decrements in one transaction.
    ///
    /// Each decrement is a conditional update guarded by `stock_quantity >= q`,
    /// so two racing sales cannot both consume the last units. Any failing line
    /// drops the transaction, which rolls back every row written so far.
    #[instrument(skip(self, request), fields(lines = request.items.len()))]
    pub async fn process_sale(
        &self,
        staff_id: i32,
        request: ProcessSaleRequest,
    ) -> Result<SaleReceipt, ServiceError> {
        let checked = validate_lines(&request.items).and_then(|()| sale_total(&request.items));
        let total = match checked {
            Ok(total) => total,
            Err(e) => {
                counter!("sales_rejected_total", 1, "reason" => "validation");
                return Err(e);
            }
        };

        let started = Instant::now();
        let result = self.run_sale_transaction(staff_id, &request, total).await;
        histogram!("sale_transaction_duration", started.elapsed());

        match &result {
            Ok(receipt) => {
                counter!("sales_processed_total", 1);
                info!(
                    sale_id = receipt.sale_id,
                    sale_number = %receipt.sale_number,
                    total = %receipt.total_amount,
                    "sale processed"
                );
            }
            Err(e) => {
                let reason = match e {
                    ServiceError::NotFound(_) => "unknown_item",
                    ServiceError::InsufficientStock(_) => "insufficient_stock",
                    _ => "error",
                };
                counter!("sales_rejected_total", 1, "reason" => reason);
                warn!(error = %e, "sale rolled back");
            }
        }

        result
    }

    async fn run_sale_transaction(
        &self,
        staff_id: i32,
        request: &ProcessSaleRequest,
        total: Decimal,
    ) -> Result<SaleReceipt, ServiceError> {
        let txn = self.db.begin().await?;
        let now = Utc::now();

        let header = sale::ActiveModel {
            sale_number: Set(generate_sale_number(now)),
            customer_name: Set(request.customer_name.clone().unwrap_or_default()),
            customer_phone: Set(request.customer_phone.clone().unwrap_or_default()),
            payment_method: Set(request
                .payment_method
                .clone()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string())),
            notes: Set(request.notes.clone().unwrap_or_default()),
            staff_id: Set(Some(staff_id)),
            total_amount: Set(total),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for line in &request.items {
            if let Err(e) = Self::decrement_stock(&txn, line).await {
                txn.rollback().await?;
                return Err(e);
            }

            let line_total = line.line_total()?;
            sale_item::ActiveModel {
                sale_id: Set(header.id),
                item_id: Set(line.item_id),
                quantity: Set(line.quantity),
                unit_price: Set(line.unit_price),
                line_total: Set(line_total),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;

        Ok(SaleReceipt {
            sale_id: header.id,
            sale_number: header.sale_number,
            total_amount: total,
        })
    }

    async fn decrement_stock(
        txn: &DatabaseTransaction,
        line: &SaleLineInput,
    ) -> Result<(), ServiceError> {
        let updated = item::Entity::update_many()
            .col_expr(
                item::Column::StockQuantity,
                Expr::col(item::Column::StockQuantity).sub(line.quantity),
            )
            .col_expr(item::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(item::Column::Id.eq(line.item_id))
            .filter(item::Column::StockQuantity.gte(line.quantity))
            .exec(txn)
            .await?;

        if updated.rows_affected == 1 {
            return Ok(());
        }

        match item::Entity::find_by_id(line.item_id).one(txn).await? {
            None => Err(ServiceError::NotFound(format!("Item {}", line.item_id))),
            Some(current) => Err(ServiceError::InsufficientStock(format!(
                "item {} has {} left, {} requested",
                current.id, current.stock_quantity, line.quantity
            ))),
        }
    }

    #[instrument(skip(self))]
    pub async fn list_sales(&self) -> Result<Vec<sale::Model>, ServiceError> {
        Ok(sale::Entity::find()
            .order_by_desc(sale::Column::CreatedAt)
            .order_by_desc(sale::Column::Id)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn get_sale(&self, id: i32) -> Result<SaleWithItems, ServiceError> {
        let sale = sale::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Sale {}", id)))?;

        let items = sale_item::Entity::find()
            .filter(sale_item::Column::SaleId.eq(id))
            .order_by_asc(sale_item::Column::Id)
            .all(&*self.db)
            .await?;

        Ok(SaleWithItems { sale, items })
    }
}
