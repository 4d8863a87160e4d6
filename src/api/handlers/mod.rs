//! HTTP request handlers.

pub mod auth_handler;
pub mod customer_handler;
pub mod performance_handler;
pub mod product_handler;

pub use auth_handler::auth_routes;
pub use customer_handler::customer_routes;
pub use performance_handler::performance_routes;
pub use product_handler::product_routes;
