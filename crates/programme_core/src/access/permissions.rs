//! Permission and role membership.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Permission names (e.g. `events.update`) and role names granted to a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionSet {
    permissions: BTreeSet<String>,
    roles: BTreeSet<String>,
}

impl PermissionSet {
    pub fn new<P, R>(permissions: P, roles: R) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            permissions: permissions.into_iter().map(Into::into).collect(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    /// True when at least one of `permissions` is granted; false for an empty list.
    pub fn has_any(&self, permissions: &[&str]) -> bool {
        permissions.iter().any(|permission| self.has(permission))
    }

    /// True when every one of `permissions` is granted; true for an empty list.
    pub fn has_all(&self, permissions: &[&str]) -> bool {
        permissions.iter().all(|permission| self.has(permission))
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}
