//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.
//!
//! Writes go through the Unit of Work transaction; reads use its query
//! repositories directly.

mod auth_service;
pub mod container;
mod customer_service;
mod performance_service;
mod product_service;
mod rules;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{issue_token, AuthService, Authenticator, Claims, TokenResponse};
pub use customer_service::{CustomerManager, CustomerService};
pub use performance_service::{PerformanceRunner, PerformanceService};
pub use product_service::{ProductManager, ProductService};
pub use rules::{CustomerRules, ProductRules};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
