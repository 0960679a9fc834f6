//! Credential store and token service implementations.

mod jwt;
mod password;

pub use jwt::{DEFAULT_SECRET, JwtConfig, JwtTokenService};
pub use password::Argon2PasswordService;
