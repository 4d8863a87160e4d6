//! Migration: Create domain_logs audit table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DomainLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DomainLogs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DomainLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DomainLogs::Message).text().not_null())
                    .col(ColumnDef::new(DomainLogs::UserName).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_domain_logs_created_at")
                    .table(DomainLogs::Table)
                    .col(DomainLogs::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DomainLogs::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum DomainLogs {
    Table,
    Id,
    CreatedAt,
    Message,
    UserName,
}
