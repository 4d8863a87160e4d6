//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod customer;
pub mod domain_log;
pub mod product;

// Re-exports for public API convenience
#[allow(unused_imports)]
pub use customer::{ActiveModel as CustomerActiveModel, Entity as CustomerEntity, Model as CustomerModel};
#[allow(unused_imports)]
pub use domain_log::{ActiveModel as DomainLogActiveModel, Entity as DomainLogEntity};
#[allow(unused_imports)]
pub use product::{ActiveModel as ProductActiveModel, Entity as ProductEntity, Model as ProductModel};
