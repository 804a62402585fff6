//! Seed data script: first admin account, starter categories and settings.
//!
//! Run with: cargo run --bin seed-data
//!
//! Safe to run repeatedly; rows that already exist are left alone, except
//! settings, which are upserted.
//!
//! The admin password comes from `SEED_ADMIN_PASSWORD` and defaults to
//! `admin12345` for local development.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use bookstore_pos_api::{
    config, db,
    errors::ServiceError,
    handlers::AppServices,
    services::{
        categories::CategoryInput, settings::UpsertSettingRequest, users::CreateUserRequest,
    },
};

const DEV_ADMIN_PASSWORD: &str = "admin12345";

const CATEGORIES: &[(&str, &str, &str)] = &[
    ("Fiction", "Novels and short stories", "bg-blue-100 text-blue-800"),
    ("Non-Fiction", "Biography, history and essays", "bg-green-100 text-green-800"),
    ("Children", "Picture books and young readers", "bg-yellow-100 text-yellow-800"),
    ("Stationery", "Notebooks, pens and cards", "bg-purple-100 text-purple-800"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = config::load_config()?;
    config::init_tracing(cfg.log_level(), cfg.log_json);

    let conn = db::establish_connection_from_app_config(&cfg).await?;
    db::run_migrations(&conn).await?;
    let services = AppServices::new(Arc::new(conn));

    let password = std::env::var("SEED_ADMIN_PASSWORD").unwrap_or_else(|_| {
        warn!("SEED_ADMIN_PASSWORD not set; using the development default");
        DEV_ADMIN_PASSWORD.to_string()
    });

    let admin = services
        .users
        .create(CreateUserRequest {
            username: "admin".to_string(),
            password,
            name: "Store Administrator".to_string(),
            email: "admin@bookstore.local".to_string(),
            role: "admin".to_string(),
        })
        .await;
    match admin {
        Ok(profile) => info!(user_id = profile.id, "admin user created"),
        Err(ServiceError::Conflict(_)) => info!("admin user already exists"),
        Err(e) => return Err(e.into()),
    }

    for (name, description, color) in CATEGORIES {
        if services.categories.find_by_name(name).await?.is_some() {
            continue;
        }
        services
            .categories
            .create(CategoryInput {
                name: name.to_string(),
                description: Some(description.to_string()),
                color: Some(color.to_string()),
                is_active: Some(true),
            })
            .await?;
        info!(category = name, "category created");
    }

    let settings = [
        ("currency", json!("USD"), "general", true, "ISO currency code shown on receipts"),
        ("tax_rate", json!(0), "general", true, "Sales tax percentage"),
        ("low_stock_threshold", json!(10), "inventory", false, "Default reorder point"),
        ("receipt_show_logo", json!(true), "receipts", true, "Print the store logo on receipts"),
    ];
    for (key, value, category, is_public, description) in settings {
        services
            .settings
            .upsert(UpsertSettingRequest {
                setting_key: key.to_string(),
                setting_value: value,
                setting_category: Some(category.to_string()),
                is_public: Some(is_public),
                description: Some(description.to_string()),
            })
            .await?;
    }
    info!("settings seeded");

    let store = services.store_details.get_or_create().await?;
    info!(store = %store.name, "seed complete");

    Ok(())
}
