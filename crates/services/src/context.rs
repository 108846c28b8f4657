use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use wordify_core::model::User;

use crate::error::AuthError;

/// Signed-in learner or administrator.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Explicit application context shared by every service.
///
/// Set on login, registration or resume; cleared on logout. Clones share
/// the same slot.
#[derive(Debug, Clone, Default)]
pub struct AppContext {
    session: Arc<RwLock<Option<Session>>>,
}

impl AppContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while the slot was held leaves a whole `Option`, so poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, Option<Session>> {
        self.session.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Session>> {
        self.session.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set(&self, session: Session) {
        *self.write() = Some(session);
    }

    pub fn clear(&self) {
        *self.write() = None;
    }

    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.read().clone()
    }

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.session().map(|s| s.user)
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.read().is_some()
    }

    /// # Errors
    ///
    /// Returns `AuthError::NotSignedIn` without a session.
    pub fn require_user(&self) -> Result<User, AuthError> {
        self.current_user().ok_or(AuthError::NotSignedIn)
    }

    /// # Errors
    ///
    /// Returns `AuthError::NotSignedIn` without a session and
    /// `AuthError::NotAdmin` for a regular learner.
    pub fn require_admin(&self) -> Result<User, AuthError> {
        let user = self.require_user()?;
        if user.is_admin() {
            Ok(user)
        } else {
            Err(AuthError::NotAdmin)
        }
    }

    /// Replace the stored profile, keeping the token.
    pub fn update_user(&self, user: User) {
        if let Some(session) = self.write().as_mut() {
            session.user = user;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordify_core::model::{Role, UserId};

    fn session(role: Role) -> Session {
        Session {
            token: "t".into(),
            user: User {
                id: UserId::new("1"),
                role,
                ..User::default()
            },
        }
    }

    #[test]
    fn lifecycle_set_then_clear() {
        let ctx = AppContext::new();
        assert!(matches!(ctx.require_user(), Err(AuthError::NotSignedIn)));

        ctx.set(session(Role::User));
        assert!(ctx.is_signed_in());
        assert!(matches!(ctx.require_admin(), Err(AuthError::NotAdmin)));

        let shared = ctx.clone();
        shared.clear();
        assert!(ctx.session().is_none());
    }

    #[test]
    fn update_user_keeps_token() {
        let ctx = AppContext::new();
        ctx.set(session(Role::Admin));
        assert!(ctx.require_admin().is_ok());

        let mut user = ctx.require_user().unwrap();
        user.name = "Renamed".into();
        ctx.update_user(user);
        let stored = ctx.session().unwrap();
        assert_eq!(stored.token, "t");
        assert_eq!(stored.user.name, "Renamed");
    }

    #[test]
    fn poisoned_slot_still_accepts_sessions() {
        let ctx = AppContext::new();
        let holder = ctx.clone();
        let crashed = std::thread::spawn(move || {
            let _slot = holder.session.write().unwrap();
            panic!("crash while holding the session");
        })
        .join();
        assert!(crashed.is_err());

        ctx.set(session(Role::Admin));
        assert!(ctx.require_admin().is_ok());
        ctx.clear();
        assert!(!ctx.is_signed_in());
    }
}
