//! Performance service - Timed bulk insert and paged read runs.
//!
//! Runs go through the regular customer and product use cases, so they
//! measure validation, hashing and auditing along with storage.

use async_trait::async_trait;
use rand::Rng;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::{CustomerService, ProductService};
use crate::config::{
    OPERATION_INSERT, OPERATION_SELECT, PERFORMANCE_MAX_INSERT, PERFORMANCE_PAGE_DELAY_MS,
    PERFORMANCE_PAGE_SIZE, PERFORMANCE_PASSWORD, PERFORMANCE_PROGRESS_INTERVAL,
};
use crate::domain::{
    authenticated, generate_customer_code, CreateCustomer, CreateProduct, GetCustomersQuery,
    GetProductsQuery, PerformanceReport, Principal,
};
use crate::errors::{AppError, AppResult};
use crate::types::Paginated;

#[async_trait]
pub trait PerformanceService: Send + Sync {
    async fn insert_customers(
        &self,
        principal: Option<&Principal>,
        quantity: u32,
    ) -> AppResult<PerformanceReport>;

    async fn select_customers(
        &self,
        principal: Option<&Principal>,
        quantity: u32,
    ) -> AppResult<PerformanceReport>;

    async fn insert_products(
        &self,
        principal: Option<&Principal>,
        quantity: u32,
    ) -> AppResult<PerformanceReport>;

    async fn select_products(
        &self,
        principal: Option<&Principal>,
        quantity: u32,
    ) -> AppResult<PerformanceReport>;
}

pub struct PerformanceRunner {
    customers: Arc<dyn CustomerService>,
    products: Arc<dyn ProductService>,
    page_delay: Duration,
}

impl PerformanceRunner {
    pub fn new(customers: Arc<dyn CustomerService>, products: Arc<dyn ProductService>) -> Self {
        Self {
            customers,
            products,
            page_delay: Duration::from_millis(PERFORMANCE_PAGE_DELAY_MS),
        }
    }

    /// Override the pause between pages of a select run
    pub fn with_page_delay(mut self, page_delay: Duration) -> Self {
        self.page_delay = page_delay;
        self
    }
}

fn check_insert_quantity(quantity: u32) -> AppResult<()> {
    if quantity == 0 || quantity > PERFORMANCE_MAX_INSERT {
        return Err(AppError::invalid(
            "quantity",
            format!("Quantity must be between 1 and {}", PERFORMANCE_MAX_INSERT),
        ));
    }
    Ok(())
}

fn check_select_quantity(quantity: u32) -> AppResult<()> {
    if quantity == 0 {
        return Err(AppError::invalid("quantity", "Quantity must be at least 1"));
    }
    Ok(())
}

fn random_customer(index: u32) -> CreateCustomer {
    let mut rng = rand::thread_rng();
    let code = generate_customer_code();
    let cedula: String = (0..10)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect();

    CreateCustomer {
        id: Some(code.clone()),
        name: format!("Perf_{}_{}", code, index),
        current_balance_cents: rng.gen_range(0..=1_000_000),
        email: format!("{}@test.com", code.to_lowercase()),
        cedula,
        password: PERFORMANCE_PASSWORD.to_string(),
        profile_picture_base64: None,
    }
}

fn random_product() -> CreateProduct {
    let mut rng = rand::thread_rng();
    let suffix: String = generate_customer_code().chars().take(8).collect();

    CreateProduct {
        name: format!("PerfTest_{}", suffix),
        unit_stock: rng.gen_range(1..500),
        unit_price_cents: rng.gen_range(100..=100_000),
    }
}

fn report(operation: &str, quantity: u32, started: Instant, message: String) -> PerformanceReport {
    PerformanceReport {
        operation: operation.to_string(),
        quantity,
        elapsed_milliseconds: started.elapsed().as_millis() as u64,
        message,
    }
}

/// Rows of `page` that still count towards `remaining`, and whether to stop.
fn consume_page<T>(page: &Paginated<T>, remaining: u32) -> (u32, bool) {
    let fetched = page.items.len() as u32;
    let counted = fetched.min(remaining);
    let short = (fetched as u64) < PERFORMANCE_PAGE_SIZE;
    (counted, fetched == 0 || short || !page.meta.has_next_page)
}

#[async_trait]
impl PerformanceService for PerformanceRunner {
    async fn insert_customers(
        &self,
        principal: Option<&Principal>,
        quantity: u32,
    ) -> AppResult<PerformanceReport> {
        authenticated(principal)?;
        check_insert_quantity(quantity)?;

        let started = Instant::now();
        let mut inserted = 0u32;
        for index in 1..=quantity {
            let request = random_customer(index);
            match self.customers.create_customer(principal, request).await {
                Ok(_) => inserted += 1,
                Err(e) => tracing::warn!(index, error = %e, "Performance insert of customer failed"),
            }
            if index % PERFORMANCE_PROGRESS_INTERVAL == 0 {
                tracing::info!("Inserted {}/{} customers", inserted, quantity);
            }
        }

        let message = format!("Inserted {} of {} customers", inserted, quantity);
        tracing::info!("{}", message);
        Ok(report(OPERATION_INSERT, inserted, started, message))
    }

    async fn select_customers(
        &self,
        principal: Option<&Principal>,
        quantity: u32,
    ) -> AppResult<PerformanceReport> {
        authenticated(principal)?;
        check_select_quantity(quantity)?;

        let started = Instant::now();
        let mut read = 0u32;
        let mut page_number = 1u64;
        while read < quantity {
            let query = GetCustomersQuery::new(page_number, PERFORMANCE_PAGE_SIZE);
            let page = self.customers.get_customers(principal, query).await?;
            let (counted, last) = consume_page(&page, quantity - read);
            read += counted;
            if last {
                break;
            }
            page_number += 1;
            tokio::time::sleep(self.page_delay).await;
        }

        let message = format!("Read {} of {} requested customers", read, quantity);
        tracing::info!("{}", message);
        Ok(report(OPERATION_SELECT, read, started, message))
    }

    async fn insert_products(
        &self,
        principal: Option<&Principal>,
        quantity: u32,
    ) -> AppResult<PerformanceReport> {
        authenticated(principal)?;
        check_insert_quantity(quantity)?;

        let started = Instant::now();
        let mut inserted = 0u32;
        for index in 1..=quantity {
            let request = random_product();
            match self.products.create_product(principal, request).await {
                Ok(_) => inserted += 1,
                Err(e) => tracing::warn!(index, error = %e, "Performance insert of product failed"),
            }
            if index % PERFORMANCE_PROGRESS_INTERVAL == 0 {
                tracing::info!("Inserted {}/{} products", inserted, quantity);
            }
        }

        let message = format!("Inserted {} of {} products", inserted, quantity);
        tracing::info!("{}", message);
        Ok(report(OPERATION_INSERT, inserted, started, message))
    }

    async fn select_products(
        &self,
        principal: Option<&Principal>,
        quantity: u32,
    ) -> AppResult<PerformanceReport> {
        authenticated(principal)?;
        check_select_quantity(quantity)?;

        let started = Instant::now();
        let mut read = 0u32;
        let mut page_number = 1u64;
        while read < quantity {
            let query = GetProductsQuery::new(page_number, PERFORMANCE_PAGE_SIZE);
            let page = self.products.get_products(principal, query).await?;
            let (counted, last) = consume_page(&page, quantity - read);
            read += counted;
            if last {
                break;
            }
            page_number += 1;
            tokio::time::sleep(self.page_delay).await;
        }

        let message = format!("Read {} of {} requested products", read, quantity);
        tracing::info!("{}", message);
        Ok(report(OPERATION_SELECT, read, started, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CredentialHasher, HashScheme, Role};
    use crate::infra::{InMemoryDomainLogger, InMemoryPersistence};
    use crate::services::{CustomerManager, ProductManager};

    fn runner(uow: Arc<InMemoryPersistence>) -> PerformanceRunner {
        let logger = Arc::new(InMemoryDomainLogger::new());
        let customers = Arc::new(CustomerManager::new(
            uow.clone(),
            logger.clone(),
            CredentialHasher::new(HashScheme::Sha256),
            10,
        ));
        let products = Arc::new(ProductManager::new(uow, logger));
        PerformanceRunner::new(customers, products).with_page_delay(Duration::ZERO)
    }

    fn admin() -> Principal {
        Principal::new("a-1", "Nancy", Role::Administrator)
    }

    #[tokio::test]
    async fn test_insert_then_select_customers() {
        let uow = Arc::new(InMemoryPersistence::default());
        let runner = runner(uow.clone());

        let inserted = runner.insert_customers(Some(&admin()), 12).await.unwrap();
        let partial = runner.select_customers(Some(&admin()), 5).await.unwrap();
        let all = runner.select_customers(Some(&admin()), 50).await.unwrap();

        assert_eq!(inserted.operation, "INSERT");
        assert_eq!(inserted.quantity, 12);
        assert_eq!(uow.store().customer_count(), 12);
        assert_eq!(partial.operation, "SELECT");
        assert_eq!(partial.quantity, 5);
        assert_eq!(all.quantity, 12);
    }

    #[tokio::test]
    async fn test_products_run() {
        let uow = Arc::new(InMemoryPersistence::default());
        let runner = runner(uow.clone());

        let inserted = runner.insert_products(Some(&admin()), 7).await.unwrap();
        let selected = runner.select_products(Some(&admin()), 100).await.unwrap();

        assert_eq!(inserted.quantity, 7);
        assert_eq!(selected.quantity, 7);
    }

    #[tokio::test]
    async fn test_quantity_bounds() {
        let runner = runner(Arc::new(InMemoryPersistence::default()));

        let zero = runner.insert_customers(Some(&admin()), 0).await;
        let too_many = runner
            .insert_products(Some(&admin()), PERFORMANCE_MAX_INSERT + 1)
            .await;
        let no_select = runner.select_customers(Some(&admin()), 0).await;

        assert!(matches!(zero, Err(AppError::Invalid(_))));
        assert!(matches!(too_many, Err(AppError::Invalid(_))));
        assert!(matches!(no_select, Err(AppError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_runs_require_principal() {
        let uow = Arc::new(InMemoryPersistence::default());
        let runner = runner(uow.clone());

        let result = runner.insert_customers(None, 3).await;

        assert!(matches!(result, Err(AppError::Unauthenticated)));
        assert!(uow.store().operations().is_empty());
    }
}
