//! Audit trail of use-case milestones.
//!
//! Entries go to the `domain_logs` table and are mirrored to `tracing`.
//! Writing an entry never fails the calling use case.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, NotSet, Set};

use super::repositories::entities::domain_log::ActiveModel;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// One audit entry
#[derive(Debug, Clone)]
pub struct DomainLog {
    pub created_at: DateTime<Utc>,
    pub message: String,
    /// Name of the acting user
    pub user_name: String,
}

impl DomainLog {
    pub fn new(message: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            created_at: Utc::now(),
            message: message.into(),
            user_name: user_name.into(),
        }
    }
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DomainLogger: Send + Sync {
    async fn log_information(&self, entry: DomainLog);
}

/// Database-backed audit log
pub struct AuditLog {
    db: DatabaseConnection,
}

impl AuditLog {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DomainLogger for AuditLog {
    async fn log_information(&self, entry: DomainLog) {
        tracing::info!(user = %entry.user_name, "{}", entry.message);

        let active_model = ActiveModel {
            id: NotSet,
            created_at: Set(entry.created_at),
            message: Set(entry.message),
            user_name: Set(entry.user_name),
        };

        if let Err(e) = active_model.insert(&self.db).await {
            tracing::error!("Failed to persist domain log: {}", e);
        }
    }
}
