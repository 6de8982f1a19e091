//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Database, RateLimiter};
use crate::services::{AuthService, CategoryService, ProductService, ServiceContainer, Services};

/// Fixed-window limits applied to every API request
#[derive(Debug, Clone, Copy)]
pub struct RateLimitSettings {
    pub permits: u64,
    pub window_seconds: u64,
}

impl From<&Config> for RateLimitSettings {
    fn from(config: &Config) -> Self {
        Self {
            permits: config.rate_limit_permits,
            window_seconds: config.rate_limit_window_seconds,
        }
    }
}

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub category_service: Arc<dyn CategoryService>,
    pub product_service: Arc<dyn ProductService>,
    pub database: Arc<Database>,
    pub rate_limiter: Arc<dyn RateLimiter>,
    pub rate_limit: RateLimitSettings,
}

impl AppState {
    /// Build the state with services wired over the database connection.
    pub fn from_config(
        database: Arc<Database>,
        rate_limiter: Arc<dyn RateLimiter>,
        config: &Config,
    ) -> Self {
        let services = Services::from_connection(database.get_connection(), config);
        Self::new(&services, database, rate_limiter, RateLimitSettings::from(config))
    }

    /// Build the state from an existing service container.
    pub fn new(
        services: &dyn ServiceContainer,
        database: Arc<Database>,
        rate_limiter: Arc<dyn RateLimiter>,
        rate_limit: RateLimitSettings,
    ) -> Self {
        Self {
            auth_service: services.auth(),
            category_service: services.categories(),
            product_service: services.products(),
            database,
            rate_limiter,
            rate_limit,
        }
    }
}
