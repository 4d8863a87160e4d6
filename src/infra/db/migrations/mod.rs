//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20250101_000001_create_customers_table;
mod m20250101_000002_create_products_table;
mod m20250101_000003_create_domain_logs_table;
mod m20250102_000001_seed_demo_customers;

pub use m20250102_000001_seed_demo_customers::DEMO_CUSTOMERS;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_customers_table::Migration),
            Box::new(m20250101_000002_create_products_table::Migration),
            Box::new(m20250101_000003_create_domain_logs_table::Migration),
            Box::new(m20250102_000001_seed_demo_customers::Migration),
        ]
    }
}
