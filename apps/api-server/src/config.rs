//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use moodlog_infra::auth::{DEFAULT_SECRET, JwtConfig};

#[cfg(feature = "postgres")]
use moodlog_infra::database::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    #[cfg(feature = "postgres")]
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub production: bool,
}

fn parsed<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        #[cfg(feature = "postgres")]
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parsed("DB_MAX_CONNECTIONS", 100),
            min_connections: parsed("DB_MIN_CONNECTIONS", 10),
        });

        let defaults = JwtConfig::default();
        let jwt = JwtConfig {
            secret: env::var("JWT_SECRET").unwrap_or(defaults.secret),
            expiration_hours: parsed("JWT_EXPIRATION_HOURS", defaults.expiration_hours),
            issuer: env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT", 8080),
            #[cfg(feature = "postgres")]
            database,
            jwt,
            production: env::var("RUST_ENV").is_ok_and(|v| v == "production"),
        }
    }

    /// Whether tokens are signed with the built-in development secret.
    pub fn uses_default_secret(&self) -> bool {
        self.jwt.secret == DEFAULT_SECRET
    }

    /// Log a warning for settings that are unsafe outside development.
    pub fn warn_insecure(&self) {
        if !self.uses_default_secret() {
            return;
        }
        if self.production {
            tracing::error!("JWT_SECRET is not set; tokens are signed with the development secret");
        } else {
            tracing::warn!("JWT_SECRET is not set; using the development secret");
        }
    }
}
