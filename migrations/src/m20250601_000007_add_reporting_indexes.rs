use sea_orm_migration::prelude::*;

use super::m20250601_000003_create_items_table::Items;
use super::m20250601_000004_create_sales_tables::{SaleItems, Sales};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // daily-sales window scan
        manager
            .create_index(
                Index::create()
                    .name("idx_sales_created_at")
                    .table(Sales::Table)
                    .col((Sales::CreatedAt, IndexOrder::Desc))
                    .to_owned(),
            )
            .await?;

        // top-selling aggregation groups on item_id
        manager
            .create_index(
                Index::create()
                    .name("idx_sale_items_item_id")
                    .table(SaleItems::Table)
                    .col(SaleItems::ItemId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_items_name")
                    .table(Items::Table)
                    .col(Items::Name)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_items_stock_quantity")
                    .table(Items::Table)
                    .col(Items::StockQuantity)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table) in [
            ("idx_items_stock_quantity", Items::Table.into_iden()),
            ("idx_items_name", Items::Table.into_iden()),
            ("idx_sale_items_item_id", SaleItems::Table.into_iden()),
            ("idx_sales_created_at", Sales::Table.into_iden()),
        ] {
            manager
                .drop_index(Index::drop().name(name).table(table).to_owned())
                .await?;
        }
        Ok(())
    }
}
