use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::Role;

/// Permission identifier.
///
/// Permissions are opaque strings (e.g. `"inventory.write"`). The wildcard
/// `"*"` grants everything.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub const ALL: Permission = Permission(Cow::Borrowed("*"));
    pub const CATALOG_READ: Permission = Permission(Cow::Borrowed("catalog.read"));
    pub const CATALOG_WRITE: Permission = Permission(Cow::Borrowed("catalog.write"));
    pub const INVENTORY_READ: Permission = Permission(Cow::Borrowed("inventory.read"));
    pub const INVENTORY_WRITE: Permission = Permission(Cow::Borrowed("inventory.write"));
    /// Recompute and persist reorder points.
    pub const INVENTORY_REORDER: Permission = Permission(Cow::Borrowed("inventory.reorder"));
    pub const SALES_READ: Permission = Permission(Cow::Borrowed("sales.read"));
    pub const SALES_RECORD: Permission = Permission(Cow::Borrowed("sales.record"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.as_str() == "*"
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

const READS: [Permission; 3] = [
    Permission::CATALOG_READ,
    Permission::INVENTORY_READ,
    Permission::SALES_READ,
];

/// Role to permission mapping.
///
/// ADMIN gets the wildcard. MANAGER writes catalog and inventory, runs the
/// reorder refresh and records sales. EMPLOYEE reads and records sales.
pub fn permissions_from_roles(roles: &[Role]) -> Vec<Permission> {
    if roles.contains(&Role::ADMIN) {
        return vec![Permission::ALL];
    }

    let mut perms: Vec<Permission> = Vec::new();
    let mut grant = |p: Permission| {
        if !perms.contains(&p) {
            perms.push(p);
        }
    };

    for role in roles {
        if *role == Role::MANAGER {
            READS.into_iter().for_each(&mut grant);
            grant(Permission::CATALOG_WRITE);
            grant(Permission::INVENTORY_WRITE);
            grant(Permission::INVENTORY_REORDER);
            grant(Permission::SALES_RECORD);
        } else if *role == Role::EMPLOYEE {
            READS.into_iter().for_each(&mut grant);
            grant(Permission::SALES_RECORD);
        }
    }

    perms
}
