//! Migration: Seed demo customers.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_customers_table::Customers;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// (code, name, balance in cents, email, cedula, stored digest)
pub const DEMO_CUSTOMERS: &[(&str, &str, i64, &str, &str, &str)] = &[
    ("ALFKI", "Alfreds Futterkiste", 0, "alfreds@demo.com", "0000000001", "hash_demo_1"),
    ("ANATR", "Ana Trujillo Emparedados y helados", 0, "ana@demo.com", "0000000002", "hash_demo_2"),
    ("ANTON", "Antonio Moreno Taquería", 10_000, "antonio@demo.com", "0000000003", "hash_demo_3"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert();
        insert.into_table(Customers::Table).columns([
            Customers::Id,
            Customers::Name,
            Customers::CurrentBalanceCents,
            Customers::Email,
            Customers::Cedula,
            Customers::HashedPassword,
        ]);

        for (id, name, balance, email, cedula, digest) in DEMO_CUSTOMERS {
            insert.values_panic([
                (*id).into(),
                (*name).into(),
                (*balance).into(),
                (*email).into(),
                (*cedula).into(),
                (*digest).into(),
            ]);
        }

        manager.exec_stmt(insert.to_owned()).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let ids: Vec<&str> = DEMO_CUSTOMERS.iter().map(|c| c.0).collect();
        let delete = Query::delete()
            .from_table(Customers::Table)
            .and_where(Expr::col(Customers::Id).is_in(ids))
            .to_owned();

        manager.exec_stmt(delete).await
    }
}
