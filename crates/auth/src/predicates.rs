//! Role predicates for rendering conditions.
//!
//! Without a company id these compare the effective role only. With a company
//! id, and when the user carries structured `company_roles`, a matching
//! per-company entry is additionally required.

use expensa_core::CompanyId;

use crate::{CompanyRole, Role, User};

fn check(
    user: Option<&User>,
    company_id: Option<&CompanyId>,
    global: &[Role],
    per_company: impl Fn(CompanyRole) -> bool,
) -> bool {
    let Some(user) = user else {
        return false;
    };
    if !global.contains(&user.role) {
        return false;
    }
    match (company_id, user.company_roles.as_deref()) {
        (Some(company_id), Some(assignments)) => assignments
            .iter()
            .any(|a| &a.company_id == company_id && per_company(a.role)),
        _ => true,
    }
}

pub fn is_super_admin(user: Option<&User>) -> bool {
    user.is_some_and(|u| u.role == Role::SuperAdmin)
}

/// Strict: only `COMPANY_OWNER` / `owner`.
pub fn is_company_owner(user: Option<&User>, company_id: Option<&CompanyId>) -> bool {
    check(user, company_id, &[Role::CompanyOwner], |r| r == CompanyRole::Owner)
}

/// Owners count as admins; admins do not count as owners.
pub fn is_company_admin(user: Option<&User>, company_id: Option<&CompanyId>) -> bool {
    check(
        user,
        company_id,
        &[Role::CompanyAdmin, Role::CompanyOwner],
        |r| r.at_least(CompanyRole::Admin),
    )
}

pub fn is_member(user: Option<&User>, company_id: Option<&CompanyId>) -> bool {
    check(user, company_id, &[Role::Member], |r| r == CompanyRole::Member)
}

pub fn can_manage_role(user: Option<&User>, target: Role) -> bool {
    user.is_some_and(|u| u.role.manages(target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CompanyRoleAssignment;
    use chrono::Utc;
    use expensa_core::UserId;

    fn company(id: &str) -> CompanyId {
        CompanyId::new(id)
    }

    fn user_in(role: Role, companies: &[(&str, CompanyRole)]) -> User {
        User::new(UserId::new("u1"), role).with_company_roles(
            companies
                .iter()
                .map(|(id, r)| CompanyRoleAssignment {
                    company_id: company(id),
                    role: *r,
                    joined_at: Some(Utc::now()),
                })
                .collect(),
        )
    }

    #[test]
    fn company_admin_scoped_to_company() {
        let u = user_in(Role::CompanyAdmin, &[("X", CompanyRole::Admin)]);
        assert!(is_company_admin(Some(&u), Some(&company("X"))));
        assert!(!is_company_admin(Some(&u), Some(&company("Y"))));
        assert!(!is_company_owner(Some(&u), Some(&company("X"))));
    }

    #[test]
    fn owner_counts_as_admin() {
        let u = user_in(Role::CompanyOwner, &[("X", CompanyRole::Owner)]);
        assert!(is_company_admin(Some(&u), Some(&company("X"))));
        assert!(is_company_owner(Some(&u), Some(&company("X"))));
        assert!(is_company_admin(Some(&u), None));
    }

    #[test]
    fn owner_requires_owner_company_role() {
        let u = user_in(Role::CompanyOwner, &[("X", CompanyRole::Admin)]);
        assert!(!is_company_owner(Some(&u), Some(&company("X"))));
        assert!(is_company_admin(Some(&u), Some(&company("X"))));
    }

    #[test]
    fn without_company_id_only_role_is_compared() {
        let u = user_in(Role::CompanyAdmin, &[]);
        assert!(is_company_admin(Some(&u), None));
        assert!(!is_company_owner(Some(&u), None));
        assert!(!is_member(Some(&u), None));
    }

    #[test]
    fn empty_company_roles_deny_scoped_checks() {
        let u = user_in(Role::Member, &[]);
        assert!(!is_member(Some(&u), Some(&company("X"))));
    }

    #[test]
    fn without_company_roles_scoped_checks_use_role_only() {
        let u = User::new(UserId::new("u1"), Role::Member);
        assert!(is_member(Some(&u), Some(&company("X"))));
    }

    #[test]
    fn member_scoped_to_member_entry() {
        let u = user_in(
            Role::Member,
            &[("X", CompanyRole::Member), ("Y", CompanyRole::Admin)],
        );
        assert!(is_member(Some(&u), Some(&company("X"))));
        assert!(!is_member(Some(&u), Some(&company("Y"))));
    }

    #[test]
    fn unrecognized_company_role_matches_nothing() {
        let u = user_in(Role::CompanyOwner, &[("X", CompanyRole::Unrecognized)]);
        assert!(!is_company_owner(Some(&u), Some(&company("X"))));
        assert!(!is_company_admin(Some(&u), Some(&company("X"))));
        assert!(is_company_owner(Some(&u), None));
    }

    #[test]
    fn anonymous_fails_every_predicate() {
        assert!(!is_super_admin(None));
        assert!(!is_company_owner(None, None));
        assert!(!is_company_admin(None, Some(&company("X"))));
        assert!(!is_member(None, None));
        assert!(!can_manage_role(None, Role::Member));
    }

    #[test]
    fn super_admin_is_not_a_company_role() {
        let u = User::new(UserId::new("root"), Role::SuperAdmin);
        assert!(is_super_admin(Some(&u)));
        assert!(!is_company_admin(Some(&u), None));
        assert!(!is_member(Some(&u), None));
    }

    #[test]
    fn can_manage_role_uses_hierarchy() {
        let admin = User::new(UserId::new("a"), Role::CompanyAdmin);
        assert!(can_manage_role(Some(&admin), Role::Member));
        assert!(!can_manage_role(Some(&admin), Role::CompanyAdmin));
        assert!(!can_manage_role(Some(&admin), Role::CompanyOwner));
    }
}
