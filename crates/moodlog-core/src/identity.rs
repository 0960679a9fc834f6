//! Caller identity and its resolution from a bearer credential.

use std::sync::Arc;

use crate::domain::UserId;
use crate::ports::{AuthError, TokenService};

/// A verified caller.
///
/// Only [`AuthContextResolver::resolve`] can produce one, so holding a
/// `Caller` means the token was checked for this request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    user_id: UserId,
}

impl Caller {
    pub fn user_id(&self) -> UserId {
        self.user_id
    }
}

/// Turns an `Authorization` header value into a [`Caller`].
#[derive(Clone)]
pub struct AuthContextResolver {
    tokens: Arc<dyn TokenService>,
}

impl AuthContextResolver {
    pub fn new(tokens: Arc<dyn TokenService>) -> Self {
        Self { tokens }
    }

    /// Resolve the caller from the raw header value, if any.
    ///
    /// Expects `Bearer <token>`; anything else is rejected before any handler runs.
    pub fn resolve(&self, authorization: Option<&str>) -> Result<Caller, AuthError> {
        let header = authorization.ok_or(AuthError::MissingToken)?;

        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()))?;
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let user_id = self.tokens.verify(token)?;
        Ok(Caller { user_id })
    }
}
