//! Session lifecycle: login, snapshot reads, company selection, logout.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use expensa_auth::{User, UserError, UserProfile, is_super_admin};
use expensa_core::CompanyId;

use crate::{SessionConfig, SessionStorage, SessionToken, TokenValidationError};

const TOKEN_KEY: &str = "token";
const USER_KEY: &str = "user";
const COMPANY_KEY: &str = "company";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid token: {0}")]
    Token(#[from] TokenValidationError),

    #[error("invalid user profile: {0}")]
    User(#[from] UserError),

    #[error("not authenticated")]
    NotAuthenticated,

    #[error("company '{0}' is not accessible to this user")]
    CompanyNotAccessible(CompanyId),

    #[error("failed to serialize session entry: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Owns the cached session in a [`SessionStorage`].
///
/// Reads return owned snapshots; nothing handed out stays linked to storage.
#[derive(Debug)]
pub struct SessionManager<S> {
    storage: S,
    config: SessionConfig,
}

impl<S: SessionStorage> SessionManager<S> {
    pub fn new(storage: S, config: SessionConfig) -> Self {
        Self { storage, config }
    }

    /// Session over `storage`, configured from the environment
    /// (see [`SessionConfig::from_env`]).
    pub fn from_env(storage: S) -> Self {
        Self::new(storage, SessionConfig::from_env())
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Start a session from a login response.
    ///
    /// Nothing is cached unless both the token and the profile are valid. The
    /// current company defaults to the user's primary company.
    pub fn login(
        &mut self,
        token: SessionToken,
        profile: UserProfile,
        now: DateTime<Utc>,
    ) -> Result<User, SessionError> {
        token.validate(now)?;
        let user = User::try_from(profile)?;

        self.clear();
        self.write(TOKEN_KEY, &token)?;
        self.write(USER_KEY, &user)?;
        if let Some(company_id) = &user.primary_company_id {
            self.write(COMPANY_KEY, company_id)?;
        }

        tracing::info!(user_id = %user.id, role = %user.role, "session started");
        Ok(user)
    }

    /// Replace the cached user after a profile refresh, keeping the token.
    ///
    /// A company selection the refreshed user can no longer access is dropped.
    pub fn refresh_profile(
        &mut self,
        profile: UserProfile,
        now: DateTime<Utc>,
    ) -> Result<User, SessionError> {
        if self.valid_token(now).is_none() {
            return Err(SessionError::NotAuthenticated);
        }
        let user = User::try_from(profile)?;
        self.write(USER_KEY, &user)?;

        if let Some(company_id) = self.read::<CompanyId>(COMPANY_KEY) {
            if !can_access(&user, &company_id) {
                tracing::info!(company_id = %company_id, "dropping inaccessible company selection");
                self.storage.remove(&self.config.key(COMPANY_KEY));
            }
        }
        Ok(user)
    }

    /// The cached token, if still valid at `now`.
    pub fn valid_token(&mut self, now: DateTime<Utc>) -> Option<SessionToken> {
        let token: SessionToken = self.read(TOKEN_KEY)?;
        match token.validate(now) {
            Ok(()) => Some(token),
            Err(error) => {
                tracing::info!(%error, "cached token rejected; clearing session");
                self.clear();
                None
            }
        }
    }

    /// Snapshot of the signed-in user, or `None` when signed out or expired.
    pub fn current_user(&mut self, now: DateTime<Utc>) -> Option<User> {
        self.valid_token(now)?;
        let user = self.read(USER_KEY);
        if user.is_none() {
            self.clear();
        }
        user
    }

    /// Company the UI is acting within, or `None` when signed out or expired.
    pub fn current_company(&mut self, now: DateTime<Utc>) -> Option<CompanyId> {
        self.valid_token(now)?;
        self.read(COMPANY_KEY)
    }

    /// Switch the company the UI is acting within.
    pub fn select_company(
        &mut self,
        company_id: CompanyId,
        now: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        let user = self.current_user(now).ok_or(SessionError::NotAuthenticated)?;
        if !can_access(&user, &company_id) {
            tracing::warn!(user_id = %user.id, company_id = %company_id, "company selection refused");
            return Err(SessionError::CompanyNotAccessible(company_id));
        }
        self.write(COMPANY_KEY, &company_id)?;
        tracing::debug!(company_id = %company_id, "company selected");
        Ok(())
    }

    pub fn logout(&mut self) {
        self.clear();
        tracing::info!("session ended");
    }

    fn clear(&mut self) {
        for name in [TOKEN_KEY, USER_KEY, COMPANY_KEY] {
            self.storage.remove(&self.config.key(name));
        }
    }

    fn write<T: Serialize>(&mut self, name: &str, value: &T) -> Result<(), SessionError> {
        let json = serde_json::to_string(value)?;
        self.storage.set(&self.config.key(name), json);
        Ok(())
    }

    /// Read and decode an entry; undecodable entries are logged and removed.
    fn read<T: DeserializeOwned>(&mut self, name: &str) -> Option<T> {
        let key = self.config.key(name);
        let json = self.storage.get(&key)?;
        match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::warn!(%key, %error, "corrupt session entry; removing");
                self.storage.remove(&key);
                None
            }
        }
    }
}

fn can_access(user: &User, company_id: &CompanyId) -> bool {
    is_super_admin(Some(user)) || user.belongs_to(company_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStorage;
    use chrono::Duration;
    use expensa_auth::permissions::names::MANAGE_BUDGETS;
    use expensa_auth::{CompanyRole, CompanyRoleAssignment, Role, has_permission};

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    fn token(now: DateTime<Utc>) -> SessionToken {
        SessionToken {
            token: "t0k3n".to_string(),
            issued_at: now - Duration::minutes(1),
            expires_at: now + Duration::hours(1),
        }
    }

    fn admin_profile() -> UserProfile {
        UserProfile {
            id: "u1".to_string(),
            email: "admin@example.com".to_string(),
            name: "Admin".to_string(),
            role: Some("COMPANY_ADMIN".to_string()),
            company_roles: Some(vec![CompanyRoleAssignment {
                company_id: CompanyId::new("acme"),
                role: CompanyRole::Admin,
                joined_at: Some(now()),
            }]),
            ..Default::default()
        }
    }

    fn manager() -> SessionManager<MemoryStorage> {
        SessionManager::new(MemoryStorage::new(), SessionConfig::default())
    }

    #[test]
    fn login_caches_user_and_primary_company() {
        let mut session = manager();
        let t = now();
        let user = session.login(token(t), admin_profile(), t).unwrap();

        assert_eq!(user.role, Role::CompanyAdmin);
        assert_eq!(session.current_user(t), Some(user));
        assert_eq!(session.current_company(t), Some(CompanyId::new("acme")));
    }

    #[test]
    fn snapshot_feeds_permission_checks() {
        let mut session = manager();
        let t = now();
        session.login(token(t), admin_profile(), t).unwrap();

        let user = session.current_user(t);
        let company = session.current_company(t);
        assert!(has_permission(user.as_ref(), MANAGE_BUDGETS, company.as_ref()));
    }

    #[test]
    fn login_rejects_profile_without_role() {
        let mut session = manager();
        let t = now();
        let profile = UserProfile {
            id: "u1".to_string(),
            ..Default::default()
        };
        let err = session.login(token(t), profile, t).unwrap_err();
        assert!(matches!(err, SessionError::User(UserError::MissingRole)));
        assert!(session.storage().is_empty());
    }

    #[test]
    fn login_rejects_expired_token() {
        let mut session = manager();
        let t = now();
        let err = session
            .login(token(t), admin_profile(), t + Duration::hours(2))
            .unwrap_err();
        assert!(matches!(err, SessionError::Token(TokenValidationError::Expired)));
        assert!(session.storage().is_empty());
    }

    #[test]
    fn expired_session_yields_no_user_and_is_cleared() {
        let mut session = manager();
        let t = now();
        session.login(token(t), admin_profile(), t).unwrap();

        assert_eq!(session.current_user(t + Duration::hours(2)), None);
        assert!(session.storage().is_empty());
    }

    #[test]
    fn corrupt_user_entry_is_cleared() {
        let mut storage = MemoryStorage::new();
        let t = now();
        storage.set(
            "expensa.token",
            serde_json::to_string(&token(t)).unwrap(),
        );
        storage.set("expensa.user", "{not json".to_string());

        let mut session = SessionManager::new(storage, SessionConfig::default());
        assert_eq!(session.current_user(t), None);
        assert!(session.storage().is_empty());
    }

    #[test]
    fn expired_session_hides_company() {
        let mut session = manager();
        let t = now();
        session.login(token(t), admin_profile(), t).unwrap();

        assert_eq!(session.current_company(t + Duration::hours(2)), None);
        assert!(session.storage().is_empty());
    }

    #[test]
    fn corrupt_company_entry_is_removed() {
        let mut session = manager();
        let t = now();
        session.login(token(t), admin_profile(), t).unwrap();

        let mut storage = session.storage().clone();
        storage.set("expensa.company", "[1,2".to_string());
        let mut session = SessionManager::new(storage, SessionConfig::default());

        assert_eq!(session.current_company(t), None);
        assert_eq!(session.storage().get("expensa.company"), None);
        assert!(session.current_user(t).is_some());
    }

    #[test]
    fn select_company_requires_membership() {
        let mut session = manager();
        let t = now();
        session.login(token(t), admin_profile(), t).unwrap();

        let err = session.select_company(CompanyId::new("globex"), t).unwrap_err();
        assert!(matches!(err, SessionError::CompanyNotAccessible(ref c) if c.as_str() == "globex"));
        assert_eq!(session.current_company(t), Some(CompanyId::new("acme")));
    }

    #[test]
    fn super_admin_may_select_any_company() {
        let mut session = manager();
        let t = now();
        let profile = UserProfile {
            id: "root".to_string(),
            role: Some("SUPER_ADMIN".to_string()),
            ..Default::default()
        };
        session.login(token(t), profile, t).unwrap();
        assert_eq!(session.current_company(t), None);

        session.select_company(CompanyId::new("globex"), t).unwrap();
        assert_eq!(session.current_company(t), Some(CompanyId::new("globex")));
    }

    #[test]
    fn select_company_requires_session() {
        let mut session = manager();
        let err = session.select_company(CompanyId::new("acme"), now()).unwrap_err();
        assert!(matches!(err, SessionError::NotAuthenticated));
    }

    #[test]
    fn refresh_drops_lost_company() {
        let mut session = manager();
        let t = now();
        session.login(token(t), admin_profile(), t).unwrap();

        let mut moved = admin_profile();
        moved.company_roles = Some(vec![CompanyRoleAssignment {
            company_id: CompanyId::new("globex"),
            role: CompanyRole::Member,
            joined_at: Some(t),
        }]);
        moved.role = Some("MEMBER".to_string());

        let user = session.refresh_profile(moved, t).unwrap();
        assert_eq!(user.role, Role::Member);
        assert_eq!(session.current_company(t), None);
        assert_eq!(session.current_user(t).map(|u| u.role), Some(Role::Member));
    }

    #[test]
    fn logout_clears_everything() {
        let mut session = manager();
        let t = now();
        session.login(token(t), admin_profile(), t).unwrap();
        session.logout();

        assert_eq!(session.current_user(t), None);
        assert_eq!(session.current_company(t), None);
        assert!(session.storage().is_empty());
    }

    #[test]
    fn namespaces_do_not_collide() {
        let t = now();
        let mut a = SessionManager::new(MemoryStorage::new(), SessionConfig::new("a"));
        a.login(token(t), admin_profile(), t).unwrap();

        let mut b = SessionManager::new(a.storage().clone(), SessionConfig::new("b"));
        assert_eq!(b.current_user(t), None);
    }
}
