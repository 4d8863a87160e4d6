//! NorthWind Sales - Customer and product administration backend
//!
//! Customers and products are managed through authenticated use cases
//! that validate against business rules, write inside a unit of work and
//! leave an audit trail.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Entities, requests, validation and role policy
//! - **services**: Application use cases
//! - **infra**: Database, repositories, unit of work, audit log
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (pagination, responses)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server against PostgreSQL
//! cargo run -- serve
//!
//! # Start the server without a database
//! cargo run -- serve --in-memory
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Issue a staff token
//! cargo run -- token --name Nancy --role Administrator
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Customer, Principal, Product, Role};
pub use errors::{AppError, AppResult};
