use sea_orm_migration::prelude::*;

use super::m20250601_000001_create_users_table::Users;
use super::m20250601_000003_create_items_table::Items;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sales::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sales::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Sales::SaleNumber)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Sales::CustomerName)
                            .string_len(255)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Sales::CustomerPhone)
                            .string_len(50)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Sales::PaymentMethod)
                            .string_len(50)
                            .not_null()
                            .default("cash"),
                    )
                    .col(ColumnDef::new(Sales::Notes).text().not_null().default(""))
                    .col(ColumnDef::new(Sales::StaffId).integer().null())
                    .col(
                        ColumnDef::new(Sales::TotalAmount)
                            .decimal_len(12, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Sales::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sales_staff_id")
                            .from(Sales::Table, Sales::StaffId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SaleItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SaleItems::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SaleItems::SaleId).integer().not_null())
                    .col(ColumnDef::new(SaleItems::ItemId).integer().not_null())
                    .col(ColumnDef::new(SaleItems::Quantity).integer().not_null())
                    .col(
                        ColumnDef::new(SaleItems::UnitPrice)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SaleItems::LineTotal)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SaleItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sale_items_sale_id")
                            .from(SaleItems::Table, SaleItems::SaleId)
                            .to(Sales::Table, Sales::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sale_items_item_id")
                            .from(SaleItems::Table, SaleItems::ItemId)
                            .to(Items::Table, Items::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sale_items_sale_id")
                    .table(SaleItems::Table)
                    .col(SaleItems::SaleId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SaleItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sales::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Sales {
    Table,
    Id,
    SaleNumber,
    CustomerName,
    CustomerPhone,
    PaymentMethod,
    Notes,
    StaffId,
    TotalAmount,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum SaleItems {
    Table,
    Id,
    SaleId,
    ItemId,
    Quantity,
    UnitPrice,
    LineTotal,
    CreatedAt,
}
