//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_JWT_AUDIENCE, DEFAULT_JWT_ISSUER,
    DEFAULT_RATE_LIMIT_PERMITS, DEFAULT_RATE_LIMIT_WINDOW_SECONDS,
    DEFAULT_REFRESH_TOKEN_VALIDITY_MINUTES, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    DEFAULT_TOKEN_VALIDITY_MINUTES, MIN_JWT_SECRET_LENGTH,
};
use crate::errors::{AppError, AppResult};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    /// Shared rate-limit store; in-process counters when unset
    pub redis_url: Option<String>,
    jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub token_validity_minutes: i64,
    pub refresh_token_validity_minutes: i64,
    pub rate_limit_permits: u64,
    pub rate_limit_window_seconds: u64,
    pub server_host: String,
    pub server_port: u16,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("redis_url", &self.redis_url.as_ref().map(|_| "[REDACTED]"))
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_issuer", &self.jwt_issuer)
            .field("jwt_audience", &self.jwt_audience)
            .field("token_validity_minutes", &self.token_validity_minutes)
            .field(
                "refresh_token_validity_minutes",
                &self.refresh_token_validity_minutes,
            )
            .field("rate_limit_permits", &self.rate_limit_permits)
            .field("rate_limit_window_seconds", &self.rate_limit_window_seconds)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .finish()
    }
}

impl Config {
    /// Build a configuration with defaults for everything except the
    /// database URL and signing secret.
    ///
    /// # Errors
    /// Returns a validation error if the secret is shorter than
    /// `MIN_JWT_SECRET_LENGTH`.
    pub fn new(database_url: impl Into<String>, jwt_secret: impl Into<String>) -> AppResult<Self> {
        let jwt_secret = jwt_secret.into();
        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(AppError::validation(format!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            )));
        }

        Ok(Self {
            database_url: database_url.into(),
            redis_url: None,
            jwt_secret,
            jwt_issuer: DEFAULT_JWT_ISSUER.to_string(),
            jwt_audience: DEFAULT_JWT_AUDIENCE.to_string(),
            token_validity_minutes: DEFAULT_TOKEN_VALIDITY_MINUTES,
            refresh_token_validity_minutes: DEFAULT_REFRESH_TOKEN_VALIDITY_MINUTES,
            rate_limit_permits: DEFAULT_RATE_LIMIT_PERMITS,
            rate_limit_window_seconds: DEFAULT_RATE_LIMIT_WINDOW_SECONDS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if JWT_SECRET is not set in release builds or is too short.
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

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let base = match Self::new(database_url, jwt_secret) {
            Ok(config) => config,
            Err(e) => panic!("{}", e),
        };

        Self {
            redis_url: env::var("REDIS_URL").ok().filter(|v| !v.is_empty()),
            jwt_issuer: env::var("JWT_VALID_ISSUER").unwrap_or(base.jwt_issuer.clone()),
            jwt_audience: env::var("JWT_VALID_AUDIENCE").unwrap_or(base.jwt_audience.clone()),
            token_validity_minutes: parse_var("JWT_TOKEN_VALIDITY_MINUTES")
                .unwrap_or(base.token_validity_minutes),
            refresh_token_validity_minutes: parse_var("JWT_REFRESH_TOKEN_VALIDITY_MINUTES")
                .unwrap_or(base.refresh_token_validity_minutes),
            rate_limit_permits: parse_var("RATE_LIMIT_PERMIT_LIMIT")
                .unwrap_or(base.rate_limit_permits),
            rate_limit_window_seconds: parse_var("RATE_LIMIT_WINDOW_SECONDS")
                .unwrap_or(base.rate_limit_window_seconds),
            server_host: env::var("SERVER_HOST").unwrap_or(base.server_host.clone()),
            server_port: parse_var("SERVER_PORT").unwrap_or(base.server_port),
            ..base
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

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_secret_rejected() {
        let result = Config::new("sqlite::memory:", "too-short");
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::new("sqlite::memory:", "a-secret-key-that-is-long-enough-123").unwrap();
        assert_eq!(config.token_validity_minutes, DEFAULT_TOKEN_VALIDITY_MINUTES);
        assert_eq!(config.server_addr(), "0.0.0.0:3000");
        assert!(config.redis_url.is_none());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = Config::new("postgres://user:pw@db/catalog", "a-secret-key-that-is-long-enough-123").unwrap();
        let printed = format!("{:?}", config);
        assert!(!printed.contains("a-secret-key"));
        assert!(!printed.contains("user:pw"));
    }
}
