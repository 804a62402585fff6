// Catalog
pub mod categories;
pub mod items;

// Point of sale
pub mod sales;

// Back office
pub mod approvals;
pub mod reports;
pub mod settings;
pub mod store_details;
pub mod users;
