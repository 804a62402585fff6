pub use sea_orm_migration::prelude::*;

mod m20250601_000001_create_users_table;
mod m20250601_000002_create_categories_table;
mod m20250601_000003_create_items_table;
mod m20250601_000004_create_sales_tables;
mod m20250601_000005_create_approvals_table;
mod m20250601_000006_create_settings_tables;
mod m20250601_000007_add_reporting_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_users_table::Migration),
            Box::new(m20250601_000002_create_categories_table::Migration),
            Box::new(m20250601_000003_create_items_table::Migration),
            Box::new(m20250601_000004_create_sales_tables::Migration),
            Box::new(m20250601_000005_create_approvals_table::Migration),
            Box::new(m20250601_000006_create_settings_tables::Migration),
            Box::new(m20250601_000007_add_reporting_indexes::Migration),
        ]
    }
}
