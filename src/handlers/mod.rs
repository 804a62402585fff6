pub mod approvals;
pub mod auth;
pub mod categories;
pub mod common;
pub mod items;
pub mod reports;
pub mod sales;
pub mod settings;
pub mod store_details;
pub mod users;

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::services::{
    approvals::ApprovalService, categories::CategoryService, items::ItemService,
    reports::ReportService, sales::SaleService, settings::SettingsService,
    store_details::StoreDetailsService, users::UserService,
};

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub categories: Arc<CategoryService>,
    pub items: Arc<ItemService>,
    pub sales: Arc<SaleService>,
    pub users: Arc<UserService>,
    pub approvals: Arc<ApprovalService>,
    pub settings: Arc<SettingsService>,
    pub store_details: Arc<StoreDetailsService>,
    pub reports: Arc<ReportService>,
}

impl AppServices {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            categories: Arc::new(CategoryService::new(db.clone())),
            items: Arc::new(ItemService::new(db.clone())),
            sales: Arc::new(SaleService::new(db.clone())),
            users: Arc::new(UserService::new(db.clone())),
            approvals: Arc::new(ApprovalService::new(db.clone())),
            settings: Arc::new(SettingsService::new(db.clone())),
            store_details: Arc::new(StoreDetailsService::new(db.clone())),
            reports: Arc::new(ReportService::new(db)),
        }
    }
}
