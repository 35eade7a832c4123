//! Application configuration loaded from environment variables.

use std::env;

use blogicum_infra::JwtConfig;
#[cfg(feature = "postgres")]
use blogicum_infra::database::DatabaseConfig;

#[cfg(feature = "rate-limit")]
use blogicum_infra::RateLimitConfig;

/// Where the login guard sends anonymous visitors.
pub const DEFAULT_LOGIN_URL: &str = "/auth/login/";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs the in-memory store.
    #[cfg(feature = "postgres")]
    pub database: Option<DatabaseConfig>,
    pub login_url: String,
    pub jwt: JwtConfig,
    #[cfg(feature = "rate-limit")]
    pub rate_limit: RateLimitConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            #[cfg(feature = "postgres")]
            database: DatabaseConfig::from_env(),
            login_url: env::var("LOGIN_URL").unwrap_or_else(|_| DEFAULT_LOGIN_URL.to_string()),
            jwt: JwtConfig::from_env(),
            #[cfg(feature = "rate-limit")]
            rate_limit: RateLimitConfig::from_env(),
        }
    }
}
