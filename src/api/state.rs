//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Database;
use crate::services::{
    AuthService, CustomerService, PerformanceService, ProductService, ServiceContainer, Services,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub customer_service: Arc<dyn CustomerService>,
    pub product_service: Arc<dyn ProductService>,
    pub performance_service: Arc<dyn PerformanceService>,
    /// Database connection; `None` when serving from memory
    pub database: Option<Arc<Database>>,
}

impl AppState {
    /// Create application state backed by PostgreSQL.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let container = Services::from_connection(database.get_connection(), config);
        Self::from_container(&container, Some(database))
    }

    /// Create application state backed by a seeded in-memory store.
    pub fn in_memory(config: Config) -> AppResult<Self> {
        let container = Services::in_memory(config)?;
        Ok(Self::from_container(&container, None))
    }

    /// Create application state from any service container.
    pub fn from_container(
        container: &dyn ServiceContainer,
        database: Option<Arc<Database>>,
    ) -> Self {
        Self {
            auth_service: container.auth(),
            customer_service: container.customers(),
            product_service: container.products(),
            performance_service: container.performance(),
            database,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::MockServiceContainer;

    #[test]
    fn test_state_takes_each_service_once() {
        let services = Services::in_memory(Config::with_jwt_secret(
            "test-secret-key-minimum-32-chars!!",
        ))
        .unwrap();
        let mut container = MockServiceContainer::new();
        let auth = services.auth();
        container.expect_auth().times(1).returning(move || auth.clone());
        let customers = services.customers();
        container
            .expect_customers()
            .times(1)
            .returning(move || customers.clone());
        let products = services.products();
        container
            .expect_products()
            .times(1)
            .returning(move || products.clone());
        let performance = services.performance();
        container
            .expect_performance()
            .times(1)
            .returning(move || performance.clone());

        let state = AppState::from_container(&container, None);

        assert!(state.database.is_none());
    }
}
