use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SystemSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SystemSettings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SystemSettings::SettingKey)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(SystemSettings::SettingValue)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(SystemSettings::SettingCategory)
                            .string_len(100)
                            .not_null()
                            .default("system_settings"),
                    )
                    .col(
                        ColumnDef::new(SystemSettings::IsPublic)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(SystemSettings::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(SystemSettings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SystemSettings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StoreDetails::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StoreDetails::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StoreDetails::Name)
                            .string_len(255)
                            .not_null()
                            .default("Bookstore"),
                    )
                    .col(ColumnDef::new(StoreDetails::Contact).string_len(100).not_null().default(""))
                    .col(ColumnDef::new(StoreDetails::Website).string_len(255).not_null().default(""))
                    .col(ColumnDef::new(StoreDetails::Address).text().not_null().default(""))
                    .col(ColumnDef::new(StoreDetails::Fax).string_len(100).not_null().default(""))
                    .col(ColumnDef::new(StoreDetails::Email).string_len(255).not_null().default(""))
                    .col(ColumnDef::new(StoreDetails::TaxNumber).string_len(100).not_null().default(""))
                    .col(ColumnDef::new(StoreDetails::ReceiptFooter).text().not_null().default(""))
                    .col(ColumnDef::new(StoreDetails::Logo).text().not_null().default(""))
                    .col(
                        ColumnDef::new(StoreDetails::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StoreDetails::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SystemSettings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum SystemSettings {
    Table,
    Id,
    SettingKey,
    SettingValue,
    SettingCategory,
    IsPublic,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum StoreDetails {
    Table,
    Id,
    Name,
    Contact,
    Website,
    Address,
    Fax,
    Email,
    TaxNumber,
    ReceiptFooter,
    Logo,
    UpdatedAt,
}
