use std::sync::Arc;

use storage::repository::{AccountRepository, AuthSession};
use wordify_core::model::{AccountError, PasswordChange, ProfileUpdate, Registration, User};

use crate::context::{AppContext, Session};
use crate::error::AuthError;

/// Sign-in, sign-up and profile management on top of the shared context.
#[derive(Clone)]
pub struct AuthService {
    context: AppContext,
    accounts: Arc<dyn AccountRepository>,
}

impl AuthService {
    #[must_use]
    pub fn new(context: AppContext, accounts: Arc<dyn AccountRepository>) -> Self {
        Self { context, accounts }
    }

    #[must_use]
    pub fn context(&self) -> &AppContext {
        &self.context
    }

    fn remember(&self, session: AuthSession) -> User {
        let user = session.user.clone();
        self.context.set(Session {
            token: session.token,
            user: session.user,
        });
        tracing::info!(user = %user.id, role = %user.role, "signed in");
        user
    }

    /// # Errors
    ///
    /// Returns `AuthError::Account` for blank fields and `AuthError::Storage`
    /// for rejected credentials.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        if email.trim().is_empty() {
            return Err(AccountError::EmptyEmail.into());
        }
        if password.is_empty() {
            return Err(AccountError::EmptyPassword.into());
        }
        let session = self.accounts.login(email, password).await?;
        Ok(self.remember(session))
    }

    /// Create an account from the sign-up form and sign in with it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Account` for invalid form input and
    /// `AuthError::Storage` when the backend rejects the registration.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        password_confirm: &str,
    ) -> Result<User, AuthError> {
        let registration = Registration::from_form(name, email, password, password_confirm)?;
        let session = self.accounts.register(&registration).await?;
        Ok(self.remember(session))
    }

    /// Continue a session from a token saved by an earlier login.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` when the token is rejected.
    pub async fn resume(&self, token: &str) -> Result<User, AuthError> {
        let user = self.accounts.resume(token).await?;
        Ok(self.remember(AuthSession {
            token: token.trim().to_owned(),
            refresh: None,
            user,
        }))
    }

    pub async fn logout(&self) {
        self.accounts.logout().await;
        self.context.clear();
    }

    /// Fetch the latest profile and refresh the context copy.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotSignedIn` or `AuthError::Storage`.
    pub async fn profile(&self) -> Result<User, AuthError> {
        let user = self.context.require_user()?;
        let fresh = self.accounts.profile(&user.id).await?;
        self.context.update_user(fresh.clone());
        Ok(fresh)
    }

    /// # Errors
    ///
    /// Returns `AuthError::NotSignedIn` or `AuthError::Storage`.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, AuthError> {
        let user = self.context.require_user()?;
        let updated = self.accounts.update_profile(&user.id, update).await?;
        self.context.update_user(updated.clone());
        Ok(updated)
    }

    /// # Errors
    ///
    /// Returns `AuthError::Account` when the confirmation differs,
    /// `AuthError::NotSignedIn`, or `AuthError::Storage` for a wrong
    /// current password.
    pub async fn change_password(
        &self,
        current: &str,
        new: &str,
        confirm: &str,
    ) -> Result<(), AuthError> {
        let change = PasswordChange::new(current, new, confirm)?;
        let user = self.context.require_user()?;
        self.accounts.change_password(&user.id, &change).await?;
        Ok(())
    }
}
