//! Service Container - Centralized service access.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, CategoryManager, CategoryService, ProductManager, ProductService,
};
use crate::config::Config;
use crate::infra::Persistence;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn categories(&self) -> Arc<dyn CategoryService>;

    fn products(&self) -> Arc<dyn ProductService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    category_service: Arc<dyn CategoryService>,
    product_service: Arc<dyn ProductService>,
}

impl Services {
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        category_service: Arc<dyn CategoryService>,
        product_service: Arc<dyn ProductService>,
    ) -> Self {
        Self {
            auth_service,
            category_service,
            product_service,
        }
    }

    /// Wire every service over one shared connection pool.
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: &Config) -> Self {
        let persistence = Arc::new(Persistence::new(db));

        Self {
            auth_service: Arc::new(Authenticator::new(persistence.clone(), config)),
            category_service: Arc::new(CategoryManager::new(persistence.clone())),
            product_service: Arc::new(ProductManager::new(persistence)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryService> {
        self.category_service.clone()
    }

    fn products(&self) -> Arc<dyn ProductService> {
        self.product_service.clone()
    }
}
