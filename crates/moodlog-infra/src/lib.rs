//! # Moodlog Infrastructure
//!
//! Concrete implementations of the ports defined in `moodlog-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory store only
//! - `postgres` - PostgreSQL database support via SeaORM
//! - `auth` - JWT + Argon2 authentication

pub mod database;

#[cfg(feature = "auth")]
pub mod auth;

pub use database::InMemoryStore;

#[cfg(feature = "postgres")]
pub use database::{DatabaseConfig, PostgresLinkRepository};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
