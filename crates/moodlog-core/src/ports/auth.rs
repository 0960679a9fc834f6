//! Authentication ports: the credential store and the token service.

use crate::domain::UserId;

/// Token service trait for signed session tokens.
pub trait TokenService: Send + Sync {
    /// Issue a token for `user_id` that expires after the configured lifetime.
    fn issue(&self, user_id: UserId) -> Result<String, AuthError>;

    /// Validate a token and return the user id it was issued for.
    fn verify(&self, token: &str) -> Result<UserId, AuthError>;

    /// Lifetime of issued tokens, in seconds.
    fn expiration_seconds(&self) -> i64;
}

/// Password hashing service, used for both the login password and the app password.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password with a fresh random salt.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash. A malformed hash never verifies.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingToken,

    #[error("Hashing error: {0}")]
    HashingError(String),
}
