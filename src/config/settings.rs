//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    CUSTOMER_CODE_COLUMN_LENGTH, DEFAULT_CUSTOMER_CODE_MAX_LENGTH, DEFAULT_DATABASE_URL, DEFAULT_JWT_EXPIRATION_HOURS,
    DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, MIN_JWT_SECRET_LENGTH,
};
use crate::domain::HashScheme;

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    /// Longest customer code accepted by the business validators
    pub customer_code_max_length: usize,
    /// Scheme used when hashing new passwords
    pub password_scheme: HashScheme,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("customer_code_max_length", &self.customer_code_max_length)
            .field("password_scheme", &self.password_scheme)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if JWT_SECRET is not set or is too short (security requirement).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                // Development mode: use default but warn
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            } else {
                panic!("JWT_SECRET environment variable must be set in production");
            }
        });

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            panic!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        let password_scheme = match env::var("PASSWORD_SCHEME") {
            Ok(value) => value.parse().unwrap_or_else(|e: String| {
                tracing::warn!("{}, falling back to argon2", e);
                HashScheme::Argon2
            }),
            Err(_) => HashScheme::Argon2,
        };

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_JWT_EXPIRATION_HOURS),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            customer_code_max_length: customer_code_max_length(
                env::var("CUSTOMER_CODE_MAX_LENGTH").ok().as_deref(),
            ),
            password_scheme,
            ..Self::with_jwt_secret(jwt_secret)
        }
    }

    /// Build a configuration with defaults around the given signing secret.
    ///
    /// Used by tests and tooling that must not read the environment.
    pub fn with_jwt_secret(secret: impl Into<String>) -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            jwt_secret: secret.into(),
            jwt_expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            customer_code_max_length: DEFAULT_CUSTOMER_CODE_MAX_LENGTH,
            password_scheme: HashScheme::Argon2,
        }
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// Parse the configured code length, clamped to `1..=CUSTOMER_CODE_COLUMN_LENGTH`.
fn customer_code_max_length(raw: Option<&str>) -> usize {
    let Some(requested) = raw.and_then(|v| v.trim().parse::<usize>().ok()) else {
        return DEFAULT_CUSTOMER_CODE_MAX_LENGTH;
    };
    let clamped = requested.clamp(1, CUSTOMER_CODE_COLUMN_LENGTH);
    if clamped != requested {
        tracing::warn!(
            requested,
            clamped,
            "CUSTOMER_CODE_MAX_LENGTH outside 1..={}",
            CUSTOMER_CODE_COLUMN_LENGTH
        );
    }
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config::with_jwt_secret("a-very-long-secret-used-only-in-this-test");
        let rendered = format!("{:?}", config);

        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("a-very-long-secret"));
    }

    #[test]
    fn test_defaults() {
        let config = Config::with_jwt_secret("x".repeat(32));

        assert_eq!(config.customer_code_max_length, DEFAULT_CUSTOMER_CODE_MAX_LENGTH);
        assert_eq!(config.password_scheme, HashScheme::Argon2);
        assert_eq!(config.server_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_code_length_fits_column() {
        assert_eq!(customer_code_max_length(None), DEFAULT_CUSTOMER_CODE_MAX_LENGTH);
        assert_eq!(customer_code_max_length(Some("abc")), DEFAULT_CUSTOMER_CODE_MAX_LENGTH);
        assert_eq!(customer_code_max_length(Some("5")), 5);
        assert_eq!(customer_code_max_length(Some("11")), CUSTOMER_CODE_COLUMN_LENGTH);
        assert_eq!(customer_code_max_length(Some("0")), 1);
    }
}
