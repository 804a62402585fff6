use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{ChangePasswordRequest, LoginRequest, LoginResponse, Role, UserProfile},
    entities::{approval, category, item, sale, sale_item, store_details, system_setting},
    errors::ErrorResponse,
    handlers::common::ResourceRef,
    health::{HealthInfo, HealthStatus},
    services::{
        approvals::{CreateApprovalRequest, ReviewApprovalRequest},
        categories::CategoryInput,
        items::{CategoryRef, ItemInput, ItemWithCategory},
        reports::{DailySalesRow, TopSellingRow},
        sales::{ProcessSaleRequest, SaleLineInput, SaleReceipt, SaleWithItems},
        settings::{UpdateSettingValue, UpsertSettingRequest},
        store_details::StoreDetailsInput,
        users::{CreateUserRequest, UpdateUserRequest},
    },
    ResponseMeta,
};

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "Bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookstore POS API",
        version = "0.1.0",
        description = r#"
# Bookstore point-of-sale and inventory API

Staff log in, ring up sales against live stock and manage the catalog.
Administrators manage users, approvals, store details and settings.

## Authentication

Send the token from `POST /api/auth/login` on every protected call:

```
Authorization: Bearer <token>
```

A missing token yields 401, an invalid or expired token 403 and a role
outside the route's allowed list 403.

## Rate limiting

`/api/auth/*` and the rest of `/api/*` are limited per client IP in separate
buckets. Responses carry `X-RateLimit-Limit`, `X-RateLimit-Remaining` and
`X-RateLimit-Reset`.

## Envelope

Successful responses use `{success, data, message, errors, meta}`. Errors use
`{error, message, details, request_id, timestamp}`.
"#
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development")
    ),
    tags(
        (name = "auth", description = "Login, profile and password"),
        (name = "users", description = "Staff accounts (admin)"),
        (name = "categories", description = "Item categories"),
        (name = "items", description = "Catalog and stock"),
        (name = "sales", description = "Sale transactions"),
        (name = "approvals", description = "Staged changes awaiting admin review"),
        (name = "settings", description = "Key/value system settings"),
        (name = "store", description = "Store details printed on receipts"),
        (name = "reports", description = "Sales and stock reports"),
        (name = "health", description = "Health check")
    ),
    paths(
        crate::handlers::auth::login,
        crate::handlers::auth::profile,
        crate::handlers::auth::change_password,

        crate::handlers::users::list_users,
        crate::handlers::users::create_user,
        crate::handlers::users::update_user,
        crate::handlers::users::delete_user,

        crate::handlers::categories::list_categories,
        crate::handlers::categories::create_category,
        crate::handlers::categories::update_category,
        crate::handlers::categories::delete_category,

        crate::handlers::items::list_items,
        crate::handlers::items::low_stock_items,
        crate::handlers::items::create_item,
        crate::handlers::items::update_item,
        crate::handlers::items::delete_item,

        crate::handlers::sales::process_sale,
        crate::handlers::sales::list_sales,
        crate::handlers::sales::get_sale,

        crate::handlers::approvals::list_approvals,
        crate::handlers::approvals::create_approval,
        crate::handlers::approvals::review_approval,
        crate::handlers::approvals::delete_approval,

        crate::handlers::settings::list_settings,
        crate::handlers::settings::list_public_settings,
        crate::handlers::settings::update_setting,
        crate::handlers::settings::upsert_setting,

        crate::handlers::store_details::get_store_details,
        crate::handlers::store_details::update_store_details,

        crate::handlers::reports::daily_sales,
        crate::handlers::reports::top_selling,
        crate::handlers::reports::low_stock,

        crate::health::health_check,
    ),
    components(
        schemas(
            ResponseMeta,
            ErrorResponse,
            ResourceRef,
            Role,
            LoginRequest,
            LoginResponse,
            ChangePasswordRequest,
            UserProfile,
            CreateUserRequest,
            UpdateUserRequest,
            category::Model,
            CategoryInput,
            item::Model,
            CategoryRef,
            ItemInput,
            ItemWithCategory,
            sale::Model,
            sale_item::Model,
            SaleLineInput,
            ProcessSaleRequest,
            SaleReceipt,
            SaleWithItems,
            approval::Model,
            approval::ApprovalStatus,
            CreateApprovalRequest,
            ReviewApprovalRequest,
            system_setting::Model,
            UpsertSettingRequest,
            UpdateSettingValue,
            store_details::Model,
            StoreDetailsInput,
            DailySalesRow,
            TopSellingRow,
            HealthInfo,
            HealthStatus,
        )
    ),
    modifiers(&BearerSecurity)
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_core_paths_and_bearer_scheme() {
        let json = serde_json::to_string(&ApiDoc::openapi()).unwrap();
        assert!(json.contains("Bookstore POS API"));
        assert!(json.contains("/api/sales"));
        assert!(json.contains("/api/items/low-stock"));
        assert!(json.contains("/api/settings/{key}"));
        assert!(json.contains("\"Bearer\""));
    }
}
