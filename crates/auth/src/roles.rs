use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Global role of a user.
///
/// Declared from lowest to highest privilege; `Ord` follows that order and
/// backs [`Role::at_least`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Member,
    CompanyAdmin,
    CompanyOwner,
    SuperAdmin,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl Role {
    /// Privilege order, lowest first.
    pub const ALL: [Role; 4] = [
        Role::Member,
        Role::CompanyAdmin,
        Role::CompanyOwner,
        Role::SuperAdmin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SUPER_ADMIN",
            Role::CompanyOwner => "COMPANY_OWNER",
            Role::CompanyAdmin => "COMPANY_ADMIN",
            Role::Member => "MEMBER",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "Super Admin",
            Role::CompanyOwner => "Company Owner",
            Role::CompanyAdmin => "Company Admin",
            Role::Member => "Member",
        }
    }

    /// Roles this role may assign, edit or remove.
    ///
    /// Not derived from the privilege order: a role never manages itself.
    pub fn managed_roles(&self) -> &'static [Role] {
        match self {
            Role::SuperAdmin => &[Role::CompanyOwner, Role::CompanyAdmin, Role::Member],
            Role::CompanyOwner => &[Role::CompanyAdmin, Role::Member],
            Role::CompanyAdmin => &[Role::Member],
            Role::Member => &[],
        }
    }

    pub fn manages(&self, target: Role) -> bool {
        self.managed_roles().contains(&target)
    }

    pub fn at_least(&self, min: Role) -> bool {
        *self >= min
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUPER_ADMIN" => Ok(Role::SuperAdmin),
            "COMPANY_OWNER" => Ok(Role::CompanyOwner),
            "COMPANY_ADMIN" => Ok(Role::CompanyAdmin),
            "MEMBER" => Ok(Role::Member),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Human-readable label for a raw role value.
///
/// Unknown values are returned unchanged.
pub fn label_of(raw: &str) -> Cow<'_, str> {
    match raw.parse::<Role>() {
        Ok(role) => Cow::Borrowed(role.label()),
        Err(_) => Cow::Borrowed(raw),
    }
}

/// Raw-string form of [`Role::manages`]; unknown roles manage nothing and are
/// managed by nobody.
pub fn manages(manager: &str, target: &str) -> bool {
    match (manager.parse::<Role>(), target.parse::<Role>()) {
        (Ok(manager), Ok(target)) => manager.manages(target),
        _ => false,
    }
}

/// Raw-string form of [`Role::at_least`]; false if either role is unknown.
pub fn at_least(role: &str, min: &str) -> bool {
    match (role.parse::<Role>(), min.parse::<Role>()) {
        (Ok(role), Ok(min)) => role.at_least(min),
        _ => false,
    }
}

/// Role of a user within one company.
///
/// Values the client does not recognize deserialize as `Unrecognized`, which
/// has no rank and satisfies no check.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanyRole {
    Member,
    Admin,
    Owner,
    #[serde(other)]
    Unrecognized,
}

impl CompanyRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanyRole::Member => "member",
            CompanyRole::Admin => "admin",
            CompanyRole::Owner => "owner",
            CompanyRole::Unrecognized => "unrecognized",
        }
    }

    fn rank(&self) -> Option<u8> {
        match self {
            CompanyRole::Member => Some(0),
            CompanyRole::Admin => Some(1),
            CompanyRole::Owner => Some(2),
            CompanyRole::Unrecognized => None,
        }
    }

    pub fn is_recognized(&self) -> bool {
        self.rank().is_some()
    }

    /// `member < admin < owner`; false if either side is unrecognized.
    pub fn at_least(&self, min: CompanyRole) -> bool {
        match (self.rank(), min.rank()) {
            (Some(rank), Some(min)) => rank >= min,
            _ => false,
        }
    }
}

impl core::fmt::Display for CompanyRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
