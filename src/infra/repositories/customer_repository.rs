//! Customer repositories: read-side queries and transaction-scoped commands.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use super::entities::customer::{self, ActiveModel, Entity as CustomerEntity};
use crate::domain::{generate_customer_code, Customer, CustomerChanges, CustomerSort, CustomerSortField};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::types::{Paginated, PaginationParams};

/// Read-side customer repository.
///
/// The `*_exists` probes take an optional customer code to ignore, so an
/// update can check uniqueness against everyone but itself.
#[async_trait]
pub trait CustomerQueries: Send + Sync {
    async fn customer_name_exists(&self, name: &str, excluding_id: Option<&str>) -> AppResult<bool>;

    async fn customer_email_exists(&self, email: &str, excluding_id: Option<&str>) -> AppResult<bool>;

    async fn customer_cedula_exists(&self, cedula: &str, excluding_id: Option<&str>) -> AppResult<bool>;

    async fn find_customer_by_id(&self, id: &str) -> AppResult<Option<Customer>>;

    async fn find_customer_by_email(&self, email: &str) -> AppResult<Option<Customer>>;

    async fn list_customers(
        &self,
        params: PaginationParams,
        sort: CustomerSort,
    ) -> AppResult<Paginated<Customer>>;
}

/// Write-side customer repository, bound to one transaction.
#[async_trait]
pub trait CustomerCommands: Send + Sync {
    /// Insert a customer. An empty code is replaced by a generated one;
    /// the stored code is returned.
    async fn create_customer(&self, customer: Customer) -> AppResult<String>;

    async fn update_customer(&self, changes: CustomerChanges) -> AppResult<Customer>;

    async fn delete_customer(&self, id: &str) -> AppResult<()>;
}

/// SeaORM-backed customer queries
pub struct CustomerStore {
    db: DatabaseConnection,
}

impl CustomerStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn exists(
        &self,
        column: customer::Column,
        value: &str,
        excluding_id: Option<&str>,
    ) -> AppResult<bool> {
        let mut query = CustomerEntity::find().filter(column.eq(value));
        if let Some(id) = excluding_id {
            query = query.filter(customer::Column::Id.ne(id));
        }
        Ok(query.count(&self.db).await? > 0)
    }
}

fn sort_column(field: CustomerSortField) -> customer::Column {
    match field {
        CustomerSortField::Id => customer::Column::Id,
        CustomerSortField::Name => customer::Column::Name,
        CustomerSortField::Email => customer::Column::Email,
        CustomerSortField::Balance => customer::Column::CurrentBalanceCents,
    }
}

#[async_trait]
impl CustomerQueries for CustomerStore {
    async fn customer_name_exists(&self, name: &str, excluding_id: Option<&str>) -> AppResult<bool> {
        self.exists(customer::Column::Name, name, excluding_id).await
    }

    async fn customer_email_exists(&self, email: &str, excluding_id: Option<&str>) -> AppResult<bool> {
        self.exists(customer::Column::Email, email, excluding_id).await
    }

    async fn customer_cedula_exists(&self, cedula: &str, excluding_id: Option<&str>) -> AppResult<bool> {
        self.exists(customer::Column::Cedula, cedula, excluding_id).await
    }

    async fn find_customer_by_id(&self, id: &str) -> AppResult<Option<Customer>> {
        let result = CustomerEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Customer::from))
    }

    async fn find_customer_by_email(&self, email: &str) -> AppResult<Option<Customer>> {
        let result = CustomerEntity::find()
            .filter(customer::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Customer::from))
    }

    async fn list_customers(
        &self,
        params: PaginationParams,
        sort: CustomerSort,
    ) -> AppResult<Paginated<Customer>> {
        let order = if sort.descending { Order::Desc } else { Order::Asc };
        let paginator = CustomerEntity::find()
            .order_by(sort_column(sort.field), order)
            .order_by_asc(customer::Column::Id)
            .paginate(&self.db, params.limit());

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.page_number.saturating_sub(1)).await?;

        Ok(Paginated::new(
            models.into_iter().map(Customer::from).collect(),
            params,
            total,
        ))
    }
}

/// Transaction-aware customer commands.
///
/// Borrows the transaction so it cannot outlive it.
pub struct TxCustomerStore<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxCustomerStore<'a> {
    pub fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }
}

#[async_trait]
impl<'a> CustomerCommands for TxCustomerStore<'a> {
    async fn create_customer(&self, customer: Customer) -> AppResult<String> {
        let id = if customer.id.trim().is_empty() {
            generate_customer_code()
        } else {
            customer.id
        };

        let active_model = ActiveModel {
            id: Set(id.clone()),
            name: Set(customer.name),
            current_balance_cents: Set(customer.current_balance_cents),
            email: Set(customer.email),
            cedula: Set(customer.cedula),
            hashed_password: Set(customer.hashed_password),
            profile_picture: Set(customer.profile_picture),
        };

        active_model.insert(self.txn).await?;
        Ok(id)
    }

    async fn update_customer(&self, changes: CustomerChanges) -> AppResult<Customer> {
        let existing = CustomerEntity::find_by_id(changes.id.as_str())
            .one(self.txn)
            .await?
            .ok_or_not_found()?;

        let mut active: ActiveModel = existing.into();
        active.name = Set(changes.name);
        active.current_balance_cents = Set(changes.current_balance_cents);
        active.email = Set(changes.email);
        active.cedula = Set(changes.cedula);
        if let Some(hash) = changes.hashed_password {
            active.hashed_password = Set(hash);
        }
        if let Some(picture) = changes.profile_picture {
            active.profile_picture = Set(Some(picture));
        }

        let model = active.update(self.txn).await?;
        Ok(Customer::from(model))
    }

    async fn delete_customer(&self, id: &str) -> AppResult<()> {
        let result = CustomerEntity::delete_by_id(id).exec(self.txn).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
