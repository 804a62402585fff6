pub mod approval;
pub mod category;
pub mod item;
pub mod sale;
pub mod sale_item;
pub mod store_details;
pub mod system_setting;
pub mod user;
