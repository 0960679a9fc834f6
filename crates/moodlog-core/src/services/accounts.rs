//! Registration, login and the app password gate.

use std::sync::Arc;

use crate::domain::{NewUser, User};
use crate::error::DomainError;
use crate::identity::Caller;
use crate::ports::{BaseRepository, PasswordService, TokenService, UserRepository};

use super::{required, unique};

/// A freshly issued session token.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub expires_in: i64,
    pub user: User,
}

/// Account operations: credentials, tokens and the user's own record.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    /// Create an account and log it in.
    pub async fn register(&self, username: &str, password: &str) -> Result<Session, DomainError> {
        let username = required("username", username)?;
        if password.is_empty() {
            return Err(DomainError::Validation("password is required".to_string()));
        }

        if self.users.find_by_username(&username).await?.is_some() {
            return Err(DomainError::Conflict("Username is already taken".to_string()));
        }

        let password_hash = self.passwords.hash(password)?;
        let user = self
            .users
            .create(NewUser {
                username,
                password_hash,
            })
            .await
            .map_err(|e| unique(e, "Username is already taken"))?;

        tracing::info!(user_id = %user.id, "User registered");
        self.session_for(user)
    }

    /// Exchange a username/password pair for a session.
    ///
    /// An unknown user and a wrong password fail the same way.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, DomainError> {
        let Some(user) = self.users.find_by_username(username.trim()).await? else {
            tracing::debug!("Login rejected");
            return Err(DomainError::Unauthenticated);
        };

        if !self.passwords.verify(password, &user.password_hash) {
            tracing::debug!(user_id = %user.id, "Login rejected");
            return Err(DomainError::Unauthenticated);
        }

        self.session_for(user)
    }

    pub async fn profile(&self, caller: &Caller) -> Result<User, DomainError> {
        self.users
            .find_by_id(caller.user_id().get())
            .await?
            .ok_or_else(|| DomainError::NotFound("User not found".to_string()))
    }

    pub async fn rename(&self, caller: &Caller, username: &str) -> Result<User, DomainError> {
        let username = required("username", username)?;

        if let Some(existing) = self.users.find_by_username(&username).await? {
            if existing.id != caller.user_id() {
                return Err(DomainError::Conflict("Username is already taken".to_string()));
            }
        }

        self.users
            .update_username(caller.user_id(), &username)
            .await
            .map_err(|e| unique(e, "Username is already taken"))
    }

    /// Delete the caller's account and, through the store, everything it owns.
    ///
    /// Requires the app password.
    pub async fn delete_account(
        &self,
        caller: &Caller,
        app_password: &str,
    ) -> Result<(), DomainError> {
        let user = self.profile(caller).await?;
        self.check_app_password(&user, app_password)?;

        self.users.delete(user.id.get()).await?;
        tracing::info!(user_id = %user.id, "User deleted");
        Ok(())
    }

    pub async fn set_app_password(
        &self,
        caller: &Caller,
        app_password: &str,
    ) -> Result<(), DomainError> {
        if app_password.is_empty() {
            return Err(DomainError::Validation("app_password is required".to_string()));
        }

        let hash = self.passwords.hash(app_password)?;
        self.users.set_app_password(caller.user_id(), &hash).await?;
        Ok(())
    }

    pub async fn verify_app_password(
        &self,
        caller: &Caller,
        app_password: &str,
    ) -> Result<(), DomainError> {
        let user = self.profile(caller).await?;
        self.check_app_password(&user, app_password)
    }

    pub async fn has_app_password(&self, caller: &Caller) -> Result<bool, DomainError> {
        Ok(self.profile(caller).await?.has_app_password())
    }

    fn check_app_password(&self, user: &User, app_password: &str) -> Result<(), DomainError> {
        let Some(hash) = user.app_password_hash.as_deref().filter(|h| !h.is_empty()) else {
            return Err(DomainError::AppPasswordNotSet);
        };

        if !self.passwords.verify(app_password, hash) {
            return Err(DomainError::Unauthenticated);
        }
        Ok(())
    }

    fn session_for(&self, user: User) -> Result<Session, DomainError> {
        let token = self.tokens.issue(user.id)?;
        Ok(Session {
            token,
            expires_in: self.tokens.expiration_seconds(),
            user,
        })
    }
}
