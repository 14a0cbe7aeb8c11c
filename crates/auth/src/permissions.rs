use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::Role;

/// Permission identifier.
///
/// Permissions are opaque strings matched exactly. Two naming styles coexist:
/// upper-snake domain actions (`"MANAGE_EXPENSES"`) and lower-camel UI
/// capability flags (`"canManageExpenses"`). They are independent names, not
/// aliases of each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Permission {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Well-known permission names.
pub mod names {
    pub const MANAGE_COMPANY: &str = "MANAGE_COMPANY";
    pub const MANAGE_USERS: &str = "MANAGE_USERS";
    pub const MANAGE_EXPENSES: &str = "MANAGE_EXPENSES";
    pub const VIEW_EXPENSES: &str = "VIEW_EXPENSES";
    pub const CREATE_EXPENSES: &str = "CREATE_EXPENSES";
    pub const APPROVE_EXPENSES: &str = "APPROVE_EXPENSES";
    pub const MANAGE_BUDGETS: &str = "MANAGE_BUDGETS";
    pub const VIEW_BUDGETS: &str = "VIEW_BUDGETS";
    pub const MANAGE_CATEGORIES: &str = "MANAGE_CATEGORIES";
    pub const VIEW_ANALYTICS: &str = "VIEW_ANALYTICS";
    pub const EXPORT_DATA: &str = "EXPORT_DATA";

    pub const CAN_MANAGE_COMPANY: &str = "canManageCompany";
    pub const CAN_DELETE_COMPANY: &str = "canDeleteCompany";
    pub const CAN_MANAGE_USERS: &str = "canManageUsers";
    pub const CAN_INVITE_USERS: &str = "canInviteUsers";
    pub const CAN_MANAGE_EXPENSES: &str = "canManageExpenses";
    pub const CAN_CREATE_EXPENSES: &str = "canCreateExpenses";
    pub const CAN_APPROVE_EXPENSES: &str = "canApproveExpenses";
    pub const CAN_VIEW_OWN_EXPENSES: &str = "canViewOwnExpenses";
    pub const CAN_MANAGE_BUDGETS: &str = "canManageBudgets";
    pub const CAN_MANAGE_CATEGORIES: &str = "canManageCategories";
    pub const CAN_VIEW_ANALYTICS: &str = "canViewAnalytics";
    pub const CAN_EXPORT_DATA: &str = "canExportData";
}

use names::*;

const COMPANY_OWNER_PERMISSIONS: &[&str] = &[
    MANAGE_COMPANY,
    MANAGE_USERS,
    MANAGE_EXPENSES,
    VIEW_EXPENSES,
    CREATE_EXPENSES,
    APPROVE_EXPENSES,
    MANAGE_BUDGETS,
    VIEW_BUDGETS,
    MANAGE_CATEGORIES,
    VIEW_ANALYTICS,
    EXPORT_DATA,
    CAN_MANAGE_COMPANY,
    CAN_DELETE_COMPANY,
    CAN_MANAGE_USERS,
    CAN_INVITE_USERS,
    CAN_MANAGE_EXPENSES,
    CAN_CREATE_EXPENSES,
    CAN_APPROVE_EXPENSES,
    CAN_MANAGE_BUDGETS,
    CAN_MANAGE_CATEGORIES,
    CAN_VIEW_ANALYTICS,
    CAN_EXPORT_DATA,
];

const COMPANY_ADMIN_PERMISSIONS: &[&str] = &[
    MANAGE_USERS,
    MANAGE_EXPENSES,
    VIEW_EXPENSES,
    CREATE_EXPENSES,
    APPROVE_EXPENSES,
    MANAGE_BUDGETS,
    VIEW_BUDGETS,
    MANAGE_CATEGORIES,
    VIEW_ANALYTICS,
    EXPORT_DATA,
    CAN_MANAGE_USERS,
    CAN_INVITE_USERS,
    CAN_MANAGE_EXPENSES,
    CAN_CREATE_EXPENSES,
    CAN_APPROVE_EXPENSES,
    CAN_MANAGE_BUDGETS,
    CAN_MANAGE_CATEGORIES,
    CAN_VIEW_ANALYTICS,
    CAN_EXPORT_DATA,
];

const MEMBER_PERMISSIONS: &[&str] = &[
    VIEW_EXPENSES,
    CREATE_EXPENSES,
    VIEW_BUDGETS,
    CAN_CREATE_EXPENSES,
    CAN_VIEW_OWN_EXPENSES,
];

/// What a role is granted.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Grants {
    /// Every permission, in every company.
    All,
    /// Exactly the listed permission names.
    Only(&'static [&'static str]),
}

impl Grants {
    pub fn allows(&self, permission: impl AsRef<str>) -> bool {
        let permission = permission.as_ref();
        match self {
            Grants::All => true,
            Grants::Only(list) => list.contains(&permission),
        }
    }
}

impl Role {
    pub fn grants(&self) -> Grants {
        match self {
            Role::SuperAdmin => Grants::All,
            Role::CompanyOwner => Grants::Only(COMPANY_OWNER_PERMISSIONS),
            Role::CompanyAdmin => Grants::Only(COMPANY_ADMIN_PERMISSIONS),
            Role::Member => Grants::Only(MEMBER_PERMISSIONS),
        }
    }
}
