//! Customer service - Customer use cases.
//!
//! Every use case starts with the auth gate, then validation, then a
//! transactional write bracketed by audit entries.

use async_trait::async_trait;
use std::sync::Arc;

use super::rules::CustomerRules;
use crate::config::ANONYMOUS_ACTOR;
use crate::domain::{
    authenticated, decode_profile_picture, CreateCustomer, CredentialHasher, Customer,
    CustomerChanges, FieldRules, GetCustomersQuery, Principal, UpdateCustomer, ValidatorHub,
};
use crate::errors::AppResult;
use crate::infra::{DomainLog, DomainLogger, UnitOfWork};
use crate::types::Paginated;
use crate::with_transaction;

/// Customer service trait for dependency injection.
#[async_trait]
pub trait CustomerService: Send + Sync {
    /// Create a customer on behalf of an authenticated principal, returning its code
    async fn create_customer(
        &self,
        principal: Option<&Principal>,
        request: CreateCustomer,
    ) -> AppResult<String>;

    /// Self-service sign-up; no principal required
    async fn register_customer(&self, request: CreateCustomer) -> AppResult<String>;

    async fn update_customer(
        &self,
        principal: Option<&Principal>,
        request: UpdateCustomer,
    ) -> AppResult<Customer>;

    async fn get_customers(
        &self,
        principal: Option<&Principal>,
        query: GetCustomersQuery,
    ) -> AppResult<Paginated<Customer>>;

    /// `None` when no customer has this code
    async fn get_customer_by_id(
        &self,
        principal: Option<&Principal>,
        id: &str,
    ) -> AppResult<Option<Customer>>;

    async fn delete_customer(&self, principal: Option<&Principal>, id: &str) -> AppResult<()>;
}

/// Concrete implementation of CustomerService using Unit of Work.
pub struct CustomerManager<U: UnitOfWork> {
    uow: Arc<U>,
    logger: Arc<dyn DomainLogger>,
    hasher: CredentialHasher,
    create_rules: ValidatorHub<CreateCustomer>,
    update_rules: ValidatorHub<UpdateCustomer>,
}

impl<U: UnitOfWork> CustomerManager<U> {
    pub fn new(
        uow: Arc<U>,
        logger: Arc<dyn DomainLogger>,
        hasher: CredentialHasher,
        code_max_length: usize,
    ) -> Self {
        let create_rules = ValidatorHub::new()
            .with(FieldRules)
            .with(CustomerRules::new(uow.customers(), code_max_length));
        let update_rules = ValidatorHub::new()
            .with(FieldRules)
            .with(CustomerRules::new(uow.customers(), code_max_length));

        Self {
            uow,
            logger,
            hasher,
            create_rules,
            update_rules,
        }
    }

    async fn log(&self, message: String, actor: &str) {
        self.logger.log_information(DomainLog::new(message, actor)).await;
    }

    /// Validate, transform and persist a new customer as `actor`.
    async fn create_as(&self, actor: &str, request: CreateCustomer) -> AppResult<String> {
        self.create_rules.guard(&request).await?;

        let hashed_password = self.hasher.hash(&request.password)?;
        let name = request.name.clone();
        self.log(format!("Starting creation of customer '{}'", name), actor)
            .await;

        let customer = Customer {
            id: request.id.unwrap_or_default().trim().to_string(),
            name: request.name,
            current_balance_cents: request.current_balance_cents,
            email: request.email,
            cedula: request.cedula,
            hashed_password,
            profile_picture: decode_profile_picture(request.profile_picture_base64.as_deref()),
        };

        let result = with_transaction!(self.uow, |ctx| ctx
            .customers()
            .create_customer(customer)
            .await);

        match result {
            Ok(id) => {
                self.log(format!("Customer '{}' created", id), actor).await;
                Ok(id)
            }
            Err(e) => {
                self.log(format!("Creation of customer '{}' cancelled", name), actor)
                    .await;
                Err(e)
            }
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> CustomerService for CustomerManager<U> {
    async fn create_customer(
        &self,
        principal: Option<&Principal>,
        request: CreateCustomer,
    ) -> AppResult<String> {
        let principal = authenticated(principal)?;
        self.create_as(&principal.name, request).await
    }

    async fn register_customer(&self, request: CreateCustomer) -> AppResult<String> {
        self.create_as(ANONYMOUS_ACTOR, request).await
    }

    async fn update_customer(
        &self,
        principal: Option<&Principal>,
        request: UpdateCustomer,
    ) -> AppResult<Customer> {
        let principal = authenticated(principal)?;
        self.update_rules.guard(&request).await?;

        let hashed_password = match request.new_password() {
            Some(password) => Some(self.hasher.hash(password)?),
            None => None,
        };
        let id = request.customer_id.clone();
        self.log(format!("Starting update of customer '{}'", id), &principal.name)
            .await;

        let changes = CustomerChanges {
            id: request.customer_id,
            name: request.name,
            current_balance_cents: request.current_balance_cents,
            email: request.email,
            cedula: request.cedula,
            hashed_password,
            profile_picture: decode_profile_picture(request.profile_picture_base64.as_deref()),
        };

        let result = with_transaction!(self.uow, |ctx| ctx
            .customers()
            .update_customer(changes)
            .await);

        match result {
            Ok(customer) => {
                self.log(format!("Customer '{}' updated", id), &principal.name)
                    .await;
                Ok(customer)
            }
            Err(e) => {
                self.log(format!("Update of customer '{}' cancelled", id), &principal.name)
                    .await;
                Err(e)
            }
        }
    }

    async fn get_customers(
        &self,
        principal: Option<&Principal>,
        query: GetCustomersQuery,
    ) -> AppResult<Paginated<Customer>> {
        authenticated(principal)?;
        let params = query.pagination();
        params.validate().into_result()?;

        self.uow.customers().list_customers(params, query.sort()).await
    }

    async fn get_customer_by_id(
        &self,
        principal: Option<&Principal>,
        id: &str,
    ) -> AppResult<Option<Customer>> {
        authenticated(principal)?;
        self.uow.customers().find_customer_by_id(id).await
    }

    async fn delete_customer(&self, principal: Option<&Principal>, id: &str) -> AppResult<()> {
        let principal = authenticated(principal)?;
        self.log(format!("Starting deletion of customer '{}'", id), &principal.name)
            .await;

        let target = id.to_string();
        let result = with_transaction!(self.uow, |ctx| ctx
            .customers()
            .delete_customer(&target)
            .await);

        match result {
            Ok(()) => {
                self.log(format!("Customer '{}' deleted", id), &principal.name)
                    .await;
                Ok(())
            }
            Err(e) => {
                self.log(format!("Deletion of customer '{}' cancelled", id), &principal.name)
                    .await;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HashScheme, Role};
    use crate::errors::AppError;
    use crate::infra::{InMemoryPersistence, MockDomainLogger};

    fn request(name: &str, email: &str, cedula: &str) -> CreateCustomer {
        CreateCustomer {
            id: None,
            name: name.to_string(),
            current_balance_cents: 1_500,
            email: email.to_string(),
            cedula: cedula.to_string(),
            password: "Pass123!".to_string(),
            profile_picture_base64: None,
        }
    }

    fn manager(
        uow: Arc<InMemoryPersistence>,
        logger: MockDomainLogger,
    ) -> CustomerManager<InMemoryPersistence> {
        CustomerManager::new(
            uow,
            Arc::new(logger),
            CredentialHasher::new(HashScheme::Sha256),
            10,
        )
    }

    #[tokio::test]
    async fn test_create_logs_start_and_success() {
        let mut logger = MockDomainLogger::new();
        logger
            .expect_log_information()
            .withf(|entry| entry.user_name == "Nancy")
            .times(2)
            .return_const(());
        let service = manager(Arc::new(InMemoryPersistence::default()), logger);
        let admin = Principal::new("a-1", "Nancy", Role::Administrator);

        let id = service
            .create_customer(Some(&admin), request("Blauer See", "blauer@demo.com", "0000000007"))
            .await
            .unwrap();

        assert_eq!(id.len(), 10);
    }

    #[tokio::test]
    async fn test_invalid_request_writes_no_log() {
        let mut logger = MockDomainLogger::new();
        logger.expect_log_information().never();
        let uow = Arc::new(InMemoryPersistence::default());
        let service = manager(uow.clone(), logger);

        let result = service
            .register_customer(request("", "not-an-email", "0000000007"))
            .await;

        let errors = match result {
            Err(AppError::Invalid(errors)) => errors,
            other => panic!("expected validation failure, got {:?}", other),
        };
        assert_eq!(errors.len(), 2);
        assert!(uow.store().operations().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_customer_is_cancelled() {
        let mut logger = MockDomainLogger::new();
        let mut sequence = mockall::Sequence::new();
        logger
            .expect_log_information()
            .withf(|entry| entry.message.starts_with("Starting deletion"))
            .times(1)
            .in_sequence(&mut sequence)
            .return_const(());
        logger
            .expect_log_information()
            .withf(|entry| entry.message.ends_with("cancelled"))
            .times(1)
            .in_sequence(&mut sequence)
            .return_const(());
        let service = manager(Arc::new(InMemoryPersistence::default()), logger);
        let admin = Principal::new("a-1", "Nancy", Role::Administrator);

        let result = service.delete_customer(Some(&admin), "NOONE").await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_hashes_before_logging_start() {
        let uow = Arc::new(InMemoryPersistence::default());
        uow.store()
            .seed_customers([Customer {
                id: "ALFKI".to_string(),
                name: "Alfreds Futterkiste".to_string(),
                current_balance_cents: 0,
                email: "alfreds@demo.com".to_string(),
                cedula: "0000000001".to_string(),
                hashed_password: "digest".to_string(),
                profile_picture: None,
            }])
            .unwrap();
        let mut logger = MockDomainLogger::new();
        let mut sequence = mockall::Sequence::new();
        logger
            .expect_log_information()
            .withf(|entry| entry.message == "Starting update of customer 'ALFKI'")
            .times(1)
            .in_sequence(&mut sequence)
            .return_const(());
        logger
            .expect_log_information()
            .withf(|entry| entry.message == "Customer 'ALFKI' updated")
            .times(1)
            .in_sequence(&mut sequence)
            .return_const(());
        let service = CustomerManager::new(
            uow.clone(),
            Arc::new(logger),
            CredentialHasher::new(HashScheme::Argon2),
            10,
        );
        let admin = Principal::new("a-1", "Nancy", Role::Administrator);

        let updated = service
            .update_customer(
                Some(&admin),
                UpdateCustomer {
                    customer_id: "ALFKI".to_string(),
                    name: "Alfreds Futterkiste".to_string(),
                    current_balance_cents: 0,
                    email: "alfreds@demo.com".to_string(),
                    cedula: "0000000001".to_string(),
                    profile_picture_base64: None,
                    password: Some("NewPass456!".to_string()),
                },
            )
            .await
            .unwrap();

        assert!(updated.hashed_password.starts_with("$argon2"));
    }
}
