/*!
 * # Role-Based Access Control (RBAC) Module
 *
 * Roles are stored on the user row; permissions are derived from the role
 * and never persisted.
 */

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use utoipa::ToSchema;

use super::permissions::consts::*;

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
    Manager,
}

impl Role {
    pub fn all() -> Vec<Role> {
        Role::iter().collect()
    }

    /// Permissions granted by this role, in a stable order.
    pub fn permissions(&self) -> Vec<String> {
        ROLE_PERMISSIONS
            .get(self)
            .map(|perms| perms.iter().map(|p| p.to_string()).collect())
            .unwrap_or_default()
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        ROLE_PERMISSIONS
            .get(self)
            .map_or(false, |perms| perms.iter().any(|p| *p == permission))
    }
}

lazy_static! {
    pub static ref ROLE_PERMISSIONS: HashMap<Role, Vec<&'static str>> = {
        let mut roles = HashMap::new();

        roles.insert(
            Role::Admin,
            vec![
                MANAGE_INVENTORY,
                PROCESS_SALES,
                VIEW_SALES_HISTORY,
                VIEW_DAILY_SALES,
                UPLOAD_EXCEL,
                APPROVE_UPLOADS,
                MANAGE_SYSTEM,
                VIEW_INVENTORY,
            ],
        );

        roles.insert(Role::Staff, vec![PROCESS_SALES, UPLOAD_EXCEL, VIEW_INVENTORY]);

        roles.insert(
            Role::Manager,
            vec![
                PROCESS_SALES,
                VIEW_SALES_HISTORY,
                VIEW_DAILY_SALES,
                VIEW_INVENTORY,
            ],
        );

        roles
    };
}
