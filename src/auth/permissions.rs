/*!
 * # Permissions Module
 *
 * Permission names carried in access tokens and returned on the profile.
 */

/// Permission string constants
pub mod consts {
    pub const MANAGE_INVENTORY: &str = "manage_inventory";
    pub const PROCESS_SALES: &str = "process_sales";
    pub const VIEW_SALES_HISTORY: &str = "view_sales_history";
    pub const VIEW_DAILY_SALES: &str = "view_daily_sales";
    pub const UPLOAD_EXCEL: &str = "upload_excel";
    pub const APPROVE_UPLOADS: &str = "approve_uploads";
    pub const MANAGE_SYSTEM: &str = "manage_system";
    pub const VIEW_INVENTORY: &str = "view_inventory";
}
