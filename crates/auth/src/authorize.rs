//! Permission evaluation.
//!
//! - No IO
//! - No panics
//! - Fail closed: anything absent or unrecognized is a denial

use serde::Serialize;
use thiserror::Error;

use expensa_core::CompanyId;

use crate::{Grants, Role, User};

/// Outcome of a permission check, with the rule that decided it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PermissionDecision {
    Granted { reason: GrantReason },
    Denied { reason: DenialKind },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantReason {
    SuperAdminBypass,
    AllowListed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    Unauthenticated,
    CompanyNotAssigned,
    NotInAllowList,
}

impl PermissionDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionDecision::Granted { .. })
    }
}

/// Decide whether `user` may exercise `permission`, optionally within one company.
///
/// Rules, in order:
/// 1. no user: denied
/// 2. `SUPER_ADMIN`: granted, regardless of permission or company
/// 3. a company is given and the user carries a legacy `assigned_companies`
///    list without it: denied
/// 4. exact match against the role's allow-list
pub fn explain_permission(
    user: Option<&User>,
    permission: impl AsRef<str>,
    company_id: Option<&CompanyId>,
) -> PermissionDecision {
    let permission = permission.as_ref();
    let Some(user) = user else {
        return PermissionDecision::Denied {
            reason: DenialKind::Unauthenticated,
        };
    };

    let allow_list = match user.role.grants() {
        Grants::All => {
            return PermissionDecision::Granted {
                reason: GrantReason::SuperAdminBypass,
            };
        }
        Grants::Only(list) => list,
    };

    if let (Some(company_id), Some(assigned)) = (company_id, user.assigned_companies.as_deref()) {
        if !assigned.contains(company_id) {
            return PermissionDecision::Denied {
                reason: DenialKind::CompanyNotAssigned,
            };
        }
    }

    if allow_list.contains(&permission) {
        PermissionDecision::Granted {
            reason: GrantReason::AllowListed,
        }
    } else {
        PermissionDecision::Denied {
            reason: DenialKind::NotInAllowList,
        }
    }
}

/// Boolean form of [`explain_permission`], for rendering conditions.
pub fn has_permission(
    user: Option<&User>,
    permission: impl AsRef<str>,
    company_id: Option<&CompanyId>,
) -> bool {
    explain_permission(user, permission, company_id).is_granted()
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("not authenticated")]
    Unauthenticated,

    #[error("company '{0}' is not assigned to this user")]
    CompanyNotAssigned(CompanyId),

    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),
}

/// Guard an action before it is attempted.
///
/// Same decision as [`has_permission`], surfaced as an error so callers can `?`
/// it in front of a mutation. The server re-checks every request.
pub fn authorize(
    user: Option<&User>,
    permission: impl AsRef<str>,
    company_id: Option<&CompanyId>,
) -> Result<(), AuthzError> {
    let permission = permission.as_ref();
    let denial = match explain_permission(user, permission, company_id) {
        PermissionDecision::Granted { .. } => return Ok(()),
        PermissionDecision::Denied { reason } => reason,
    };

    tracing::debug!(
        permission,
        company_id = company_id.map(CompanyId::as_str),
        role = user.map(|u| u.role.as_str()),
        reason = ?denial,
        "permission denied"
    );

    Err(match (denial, company_id) {
        (DenialKind::Unauthenticated, _) => AuthzError::Unauthenticated,
        (DenialKind::CompanyNotAssigned, Some(company_id)) => {
            AuthzError::CompanyNotAssigned(company_id.clone())
        }
        (DenialKind::CompanyNotAssigned, None) | (DenialKind::NotInAllowList, _) => {
            AuthzError::Forbidden(permission.to_string())
        }
    })
}

/// Roles a user may hand out (e.g. to populate a role picker).
pub fn assignable_roles(user: Option<&User>) -> &'static [Role] {
    user.map_or(&[], |u| u.role.managed_roles())
}
