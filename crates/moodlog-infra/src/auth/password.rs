//! Argon2 password hashing implementation.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use moodlog_core::ports::{AuthError, PasswordService};

/// Argon2id-based password service.
///
/// The default parameters make one verification take tens of milliseconds.
pub struct Argon2PasswordService {
    argon2: Argon2<'static>,
}

impl Argon2PasswordService {
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Build with explicit cost parameters (memory in KiB, iterations, lanes).
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self, AuthError> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|e| AuthError::HashingError(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl Default for Argon2PasswordService {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordService for Argon2PasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AuthError::HashingError(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            tracing::warn!("Stored password hash could not be parsed");
            return false;
        };

        self.argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> Argon2PasswordService {
        Argon2PasswordService::with_params(1024, 1, 1).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let service = fast();
        let password = "secure_password_123";

        let hash = service.hash(password).unwrap();
        assert!(service.verify(password, &hash));
        assert!(!service.verify("wrong_password", &hash));
    }

    #[test]
    fn test_same_password_gets_fresh_salt() {
        let service = fast();

        let first = service.hash("pw1").unwrap();
        let second = service.hash("pw1").unwrap();

        assert_ne!(first, second);
        assert!(service.verify("pw1", &first));
        assert!(service.verify("pw1", &second));
    }

    #[test]
    fn test_malformed_hash_does_not_verify() {
        let service = fast();

        assert!(!service.verify("pw1", "not-a-phc-string"));
        assert!(!service.verify("pw1", ""));
    }

    #[test]
    fn test_default_params_verify_hashes_from_tuned_params() {
        let hash = fast().hash("pw1").unwrap();
        assert!(Argon2PasswordService::new().verify("pw1", &hash));
    }

    #[test]
    fn test_invalid_params_rejected() {
        assert!(Argon2PasswordService::with_params(1, 0, 0).is_err());
    }
}
