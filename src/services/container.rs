//! Service Container - Wires the use cases to a storage backend.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, CustomerManager, CustomerService, PerformanceRunner,
    PerformanceService, ProductManager, ProductService,
};
use crate::config::Config;
use crate::domain::{CredentialHasher, Customer};
use crate::errors::AppResult;
use crate::infra::db::DEMO_CUSTOMERS;
use crate::infra::{
    AuditLog, DomainLogger, InMemoryDomainLogger, InMemoryPersistence, InMemoryStore,
    Persistence, UnitOfWork,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn customers(&self) -> Arc<dyn CustomerService>;

    fn products(&self) -> Arc<dyn ProductService>;

    fn performance(&self) -> Arc<dyn PerformanceService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    customer_service: Arc<dyn CustomerService>,
    product_service: Arc<dyn ProductService>,
    performance_service: Arc<dyn PerformanceService>,
}

impl Services {
    fn build<U: UnitOfWork + 'static>(
        uow: Arc<U>,
        logger: Arc<dyn DomainLogger>,
        config: Config,
    ) -> Self {
        let hasher = CredentialHasher::new(config.password_scheme);
        let customer_service: Arc<dyn CustomerService> = Arc::new(CustomerManager::new(
            uow.clone(),
            logger.clone(),
            hasher,
            config.customer_code_max_length,
        ));
        let product_service: Arc<dyn ProductService> =
            Arc::new(ProductManager::new(uow.clone(), logger));
        let performance_service = Arc::new(PerformanceRunner::new(
            customer_service.clone(),
            product_service.clone(),
        ));
        let auth_service = Arc::new(Authenticator::new(uow, hasher, config));

        Self {
            auth_service,
            customer_service,
            product_service,
            performance_service,
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        let uow = Arc::new(Persistence::new(db.clone()));
        let logger = Arc::new(AuditLog::new(db));
        Self::build(uow, logger, config)
    }

    /// Services over a fresh in-memory store holding the demo customers.
    pub fn in_memory(config: Config) -> AppResult<Self> {
        let store = Arc::new(InMemoryStore::new());
        store.seed_customers(demo_customers())?;
        let uow = Arc::new(InMemoryPersistence::new(store));
        Ok(Self::build(uow, Arc::new(InMemoryDomainLogger::new()), config))
    }
}

fn demo_customers() -> Vec<Customer> {
    DEMO_CUSTOMERS
        .iter()
        .map(|(id, name, balance, email, cedula, digest)| Customer {
            id: id.to_string(),
            name: name.to_string(),
            current_balance_cents: *balance,
            email: email.to_string(),
            cedula: cedula.to_string(),
            hashed_password: digest.to_string(),
            profile_picture: None,
        })
        .collect()
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn customers(&self) -> Arc<dyn CustomerService> {
        self.customer_service.clone()
    }

    fn products(&self) -> Arc<dyn ProductService> {
        self.product_service.clone()
    }

    fn performance(&self) -> Arc<dyn PerformanceService> {
        self.performance_service.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GetCustomersQuery, Principal, Role};

    #[tokio::test]
    async fn test_in_memory_services_start_with_demo_customers() {
        let services =
            Services::in_memory(Config::with_jwt_secret("test-secret-key-minimum-32-chars!!"))
                .unwrap();
        let employee = Principal::new("e-1", "Nancy", Role::Employee);

        let page = services
            .customers()
            .get_customers(Some(&employee), GetCustomersQuery::new(1, 10))
            .await
            .unwrap();

        let ids: Vec<_> = page.items.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["ALFKI", "ANATR", "ANTON"]);
    }
}
