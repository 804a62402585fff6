use sea_orm_migration::prelude::*;

use super::m20250601_000002_create_categories_table::Categories;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Items::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Items::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Items::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Items::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Items::Price).decimal_len(12, 2).not_null())
                    .col(ColumnDef::new(Items::CostPrice).decimal_len(12, 2).null())
                    .col(
                        ColumnDef::new(Items::StockQuantity)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Items::MinStockLevel)
                            .integer()
                            .not_null()
                            .default(10),
                    )
                    .col(ColumnDef::new(Items::CategoryId).integer().null())
                    .col(ColumnDef::new(Items::Sku).string_len(100).null())
                    .col(ColumnDef::new(Items::Barcode).string_len(100).null())
                    .col(ColumnDef::new(Items::SupplierId).integer().null())
                    .col(
                        ColumnDef::new(Items::ImageUrl)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Items::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Items::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Items::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_items_category_id")
                            .from(Items::Table, Items::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_items_category_id")
                    .table(Items::Table)
                    .col(Items::CategoryId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Items::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Items {
    Table,
    Id,
    Name,
    Description,
    Price,
    CostPrice,
    StockQuantity,
    MinStockLevel,
    CategoryId,
    Sku,
    Barcode,
    SupplierId,
    ImageUrl,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
