//! JWT token service implementation.

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use moodlog_core::domain::UserId;
use moodlog_core::ports::{AuthError, TokenService};

/// Development-only signing secret.
pub const DEFAULT_SECRET: &str = "change-me-in-production";

/// JWT token service configuration.
///
/// The secret is injected here; the service never reads it from the environment.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            expiration_hours: 24,
            issuer: "moodlog-api".to_string(),
        }
    }
}

/// Internal JWT claims structure for serialization.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    user_id: i64,
    exp: i64,    // expiration timestamp
    iat: i64,    // issued at
    iss: String, // issuer
}

/// HS256 token service.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: JwtConfig,
}

impl JwtTokenService {
    const ALGORITHM: Algorithm = Algorithm::HS256;

    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            encoding_key,
            decoding_key,
            config,
        }
    }

    /// Issue a token as if the current time were `issued_at`.
    pub fn issue_at(&self, user_id: UserId, issued_at: DateTime<Utc>) -> Result<String, AuthError> {
        let exp = issued_at + TimeDelta::hours(self.config.expiration_hours);

        let claims = Claims {
            user_id: user_id.get(),
            exp: exp.timestamp(),
            iat: issued_at.timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::new(Self::ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    fn validation(&self) -> Validation {
        // Only the key's own algorithm is accepted; a token declaring any
        // other `alg` fails before its signature is looked at.
        let mut validation = Validation::new(Self::ALGORITHM);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation.leeway = 0;
        validation
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user_id: UserId) -> Result<String, AuthError> {
        self.issue_at(user_id, Utc::now())
    }

    fn verify(&self, token: &str) -> Result<UserId, AuthError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation())
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AuthError::InvalidToken("Token expired".to_string())
                }
                _ => AuthError::InvalidToken(e.to_string()),
            })?;

        Ok(UserId::new(token_data.claims.user_id))
    }

    fn expiration_seconds(&self) -> i64 {
        self.config.expiration_hours * 3600
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key".to_string(),
            expiration_hours: 24,
            issuer: "test-issuer".to_string(),
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let service = JwtTokenService::new(test_config());
        let user_id = UserId::new(17);

        let token = service.issue(user_id).unwrap();

        assert!(!token.is_empty());
        assert_eq!(service.verify(&token).unwrap(), user_id);
    }

    #[test]
    fn test_verify_garbage_token() {
        let service = JwtTokenService::new(test_config());

        let result = service.verify("invalid-token");

        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_verify_tampered_token() {
        let service = JwtTokenService::new(test_config());
        let token = service.issue(UserId::new(1)).unwrap();

        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        assert!(matches!(
            service.verify(&tampered),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_verify_wrong_secret() {
        let issuer = JwtTokenService::new(test_config());
        let verifier = JwtTokenService::new(JwtConfig {
            secret: "rotated-secret".to_string(),
            ..test_config()
        });

        let token = issuer.issue(UserId::new(1)).unwrap();

        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn test_rejects_other_algorithm_with_same_secret() {
        let service = JwtTokenService::new(test_config());
        let now = Utc::now();
        let claims = Claims {
            user_id: 1,
            exp: (now + TimeDelta::hours(1)).timestamp(),
            iat: now.timestamp(),
            iss: "test-issuer".to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(b"test-secret-key"),
        )
        .unwrap();

        assert!(matches!(
            service.verify(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_expires_after_lifetime() {
        let service = JwtTokenService::new(test_config());
        let user_id = UserId::new(5);

        let fresh = service
            .issue_at(user_id, Utc::now() - TimeDelta::hours(23))
            .unwrap();
        let stale = service
            .issue_at(user_id, Utc::now() - TimeDelta::hours(25))
            .unwrap();

        assert_eq!(service.verify(&fresh).unwrap(), user_id);
        assert!(matches!(
            service.verify(&stale),
            Err(AuthError::InvalidToken(msg)) if msg == "Token expired"
        ));
    }

    #[test]
    fn test_validate_wrong_issuer_token() {
        let service1 = JwtTokenService::new(JwtConfig {
            issuer: "issuer1".to_string(),
            ..test_config()
        });
        let service2 = JwtTokenService::new(JwtConfig {
            issuer: "issuer2".to_string(),
            ..test_config()
        });

        let token = service1.issue(UserId::new(3)).unwrap();

        assert!(service2.verify(&token).is_err());
    }

    #[test]
    fn test_expiration_seconds() {
        let service = JwtTokenService::new(test_config());

        assert_eq!(service.expiration_seconds(), 86400);
    }
}
