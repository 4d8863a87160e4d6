//! Infrastructure layer - External systems integration
//!
//! - Database connection and migrations
//! - Repositories (SeaORM and in-memory)
//! - Unit of Work for transaction management
//! - Domain audit logging

pub mod db;
pub mod domain_logger;
pub mod memory;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, MigrationStatus, Migrator};
pub use domain_logger::{AuditLog, DomainLog, DomainLogger};
pub use memory::{InMemoryDomainLogger, InMemoryPersistence, InMemoryStore};
pub use repositories::{
    CustomerCommands, CustomerQueries, CustomerStore, ProductCommands, ProductQueries,
    ProductStore,
};
pub use unit_of_work::{Persistence, TransactionContext, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use domain_logger::MockDomainLogger;
