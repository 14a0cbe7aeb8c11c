//! Role catalog for audit and display.
//!
//! A serializable view of the role registry: labels, privilege rank, the
//! manages table and each role's allow-list.

use serde::Serialize;

use crate::{Grants, Role};

/// One role as shown in an admin or audit screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleDefinition {
    pub role: Role,
    pub label: &'static str,
    /// Position in the privilege order; 0 is lowest.
    pub rank: usize,
    pub manages: Vec<Role>,
    /// `None` means every permission is granted.
    pub permissions: Option<Vec<&'static str>>,
}

impl RoleDefinition {
    pub fn of(role: Role) -> Self {
        let rank = Role::ALL.iter().position(|r| *r == role).unwrap_or_default();
        let permissions = match role.grants() {
            Grants::All => None,
            Grants::Only(list) => Some(list.to_vec()),
        };
        Self {
            role,
            label: role.label(),
            rank,
            manages: role.managed_roles().to_vec(),
            permissions,
        }
    }
}

/// Every role, lowest privilege first.
pub fn catalog() -> Vec<RoleDefinition> {
    Role::ALL.into_iter().map(RoleDefinition::of).collect()
}
