//! User model used by every permission check.
//!
//! The backend returns a loosely-shaped profile ([`UserProfile`]) carrying two
//! role fields and two ways of naming the primary company. It is normalized
//! exactly once into a [`User`] with a single effective role, so no caller
//! re-derives the fallbacks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use expensa_core::{CompanyId, DomainError, UserId};

use crate::{CompanyRole, Role, UnknownRole};

// ─────────────────────────────────────────────────────────────────────────────
// Company Role Assignment
// ─────────────────────────────────────────────────────────────────────────────

/// A user's membership in one company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRoleAssignment {
    pub company_id: CompanyId,
    pub role: CompanyRole,
    #[serde(default)]
    pub joined_at: Option<DateTime<Utc>>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Raw Profile (server response)
// ─────────────────────────────────────────────────────────────────────────────

/// User profile as returned by the login and profile endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    /// Legacy name of `role`.
    #[serde(default)]
    pub global_role: Option<String>,
    #[serde(default)]
    pub company_roles: Option<Vec<CompanyRoleAssignment>>,
    /// Legacy flat company scoping list.
    #[serde(default)]
    pub assigned_companies: Option<Vec<CompanyId>>,
    #[serde(default)]
    pub primary_company_id: Option<CompanyId>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Normalized User
// ─────────────────────────────────────────────────────────────────────────────

/// Authenticated user, normalized for permission evaluation.
///
/// # Invariants
/// - `role` is the effective role (`role`, falling back to `globalRole`).
/// - `primary_company_id` is resolved (`primaryCompanyId`, falling back to the
///   first company role).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub company_roles: Option<Vec<CompanyRoleAssignment>>,
    pub assigned_companies: Option<Vec<CompanyId>>,
    pub primary_company_id: Option<CompanyId>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UserError {
    #[error("profile carries neither role nor globalRole")]
    MissingRole,

    #[error(transparent)]
    UnknownRole(#[from] UnknownRole),

    #[error("{0}")]
    Domain(#[from] DomainError),
}

impl User {
    /// Minimal user with the given effective role and no company data.
    pub fn new(id: UserId, role: Role) -> Self {
        Self {
            id,
            email: String::new(),
            name: String::new(),
            role,
            company_roles: None,
            assigned_companies: None,
            primary_company_id: None,
        }
    }

    pub fn with_company_roles(mut self, company_roles: Vec<CompanyRoleAssignment>) -> Self {
        if self.primary_company_id.is_none() {
            self.primary_company_id = company_roles.first().map(|a| a.company_id.clone());
        }
        self.company_roles = Some(company_roles);
        self
    }

    pub fn with_assigned_companies(mut self, companies: Vec<CompanyId>) -> Self {
        self.assigned_companies = Some(companies);
        self
    }

    /// Per-company role for `company_id`, if the user has structured company roles.
    pub fn company_role(&self, company_id: &CompanyId) -> Option<CompanyRole> {
        self.company_roles
            .as_deref()?
            .iter()
            .find(|a| &a.company_id == company_id)
            .map(|a| a.role)
    }

    /// Whether any company data (structured or legacy) lists `company_id`.
    pub fn belongs_to(&self, company_id: &CompanyId) -> bool {
        let in_roles = self
            .company_roles
            .as_deref()
            .is_some_and(|roles| roles.iter().any(|a| &a.company_id == company_id));
        let in_assigned = self
            .assigned_companies
            .as_deref()
            .is_some_and(|ids| ids.contains(company_id));
        in_roles || in_assigned
    }
}

/// Treat blank strings as absent, like the backend's own truthiness checks.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TryFrom<UserProfile> for User {
    type Error = UserError;

    fn try_from(profile: UserProfile) -> Result<Self, Self::Error> {
        let raw_role = non_blank(profile.role)
            .or_else(|| non_blank(profile.global_role))
            .ok_or(UserError::MissingRole)?;
        // Exact match: padded or lower-case role names are not roles.
        let role: Role = raw_role.parse()?;

        let id: UserId = profile.id.parse()?;

        let company_roles = profile.company_roles.map(|roles| {
            roles
                .into_iter()
                .filter(|a| a.role.is_recognized())
                .collect::<Vec<_>>()
        });

        let primary_company_id = profile.primary_company_id.or_else(|| {
            company_roles
                .as_deref()
                .and_then(|roles| roles.first())
                .map(|a| a.company_id.clone())
        });

        Ok(Self {
            id,
            email: profile.email.trim().to_lowercase(),
            name: profile.name.trim().to_string(),
            role,
            company_roles,
            assigned_companies: profile.assigned_companies,
            primary_company_id,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
