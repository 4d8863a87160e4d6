//! Repository layer - Data access abstraction
//!
//! Queries read through a shared connection. Commands are bound to a
//! transaction and only reachable through the unit of work.

pub(crate) mod entities;
mod customer_repository;
mod product_repository;

pub use customer_repository::{CustomerCommands, CustomerQueries, CustomerStore, TxCustomerStore};
pub use product_repository::{ProductCommands, ProductQueries, ProductStore, TxProductStore};
