//! Unit of Work pattern implementation.
//!
//! Centralizes repository access and the begin/commit/rollback lifecycle.
//! Write operations are only reachable through a [`TransactionContext`],
//! so every change happens inside a transaction.

use async_trait::async_trait;
use sea_orm::{AccessMode, DatabaseConnection, IsolationLevel, TransactionTrait};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::repositories::{
    CustomerCommands, CustomerQueries, CustomerStore, ProductCommands, ProductQueries,
    ProductStore, TxCustomerStore, TxProductStore,
};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Not object safe because of the generic `transaction` method; services are
/// generic over it instead.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn customers(&self) -> Arc<dyn CustomerQueries>;

    fn products(&self) -> Arc<dyn ProductQueries>;

    /// Execute a closure within a transaction.
    ///
    /// Committed when the closure returns `Ok`, rolled back otherwise. A
    /// failed commit is reported as the transaction's error.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>
            + Send,
        T: Send;
}

/// Repository access within a transaction.
pub struct TransactionContext<'a> {
    customers: &'a dyn CustomerCommands,
    products: &'a dyn ProductCommands,
}

impl<'a> TransactionContext<'a> {
    pub fn new(customers: &'a dyn CustomerCommands, products: &'a dyn ProductCommands) -> Self {
        Self {
            customers,
            products,
        }
    }

    pub fn customers(&self) -> &'a dyn CustomerCommands {
        self.customers
    }

    pub fn products(&self) -> &'a dyn ProductCommands {
        self.products
    }
}

/// SeaORM implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    customer_repo: Arc<CustomerStore>,
    product_repo: Arc<ProductStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        let customer_repo = Arc::new(CustomerStore::new(db.clone()));
        let product_repo = Arc::new(ProductStore::new(db.clone()));
        Self {
            db,
            customer_repo,
            product_repo,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn customers(&self) -> Arc<dyn CustomerQueries> {
        self.customer_repo.clone()
    }

    fn products(&self) -> Arc<dyn ProductQueries> {
        self.product_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>
            + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::ReadCommitted), Some(AccessMode::ReadWrite))
            .await
            .map_err(AppError::from)?;

        let result = {
            let customers = TxCustomerStore::new(&txn);
            let products = TxProductStore::new(&txn);
            f(TransactionContext::new(&customers, &products)).await
        };

        match result {
            Ok(value) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Simpler API for executing transactional operations.
///
/// This helper macro reduces boilerplate when using transactions.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}
