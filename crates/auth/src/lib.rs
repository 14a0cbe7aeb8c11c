//! `expensa-auth` — client-side permission evaluation (pure, no IO).
//!
//! Decides what the UI renders and which actions it attempts. The server
//! performs the authoritative check on every request.

pub mod authorize;
pub mod catalog;
pub mod permissions;
pub mod predicates;
pub mod roles;
pub mod user;

pub use authorize::{
    AuthzError, DenialKind, GrantReason, PermissionDecision, assignable_roles, authorize,
    explain_permission, has_permission,
};
pub use catalog::{RoleDefinition, catalog};
pub use permissions::{Grants, Permission};
pub use predicates::{can_manage_role, is_company_admin, is_company_owner, is_member, is_super_admin};
pub use roles::{CompanyRole, Role, UnknownRole, at_least, label_of, manages};
pub use user::{CompanyRoleAssignment, User, UserError, UserProfile};
