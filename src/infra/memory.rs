//! In-memory persistence.
//!
//! Implements the repository ports, the unit of work and the domain logger
//! without a database. Used by `serve --in-memory` and by tests.
//!
//! Transactions work on a snapshot of the tables and keep a list of their
//! writes. Commit replays the writes against the live tables, re-checking
//! primary keys and unique columns, and publishes them all or none.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use async_trait::async_trait;

use super::domain_logger::{DomainLog, DomainLogger};
use super::repositories::{CustomerCommands, CustomerQueries, ProductCommands, ProductQueries};
use super::unit_of_work::{TransactionContext, UnitOfWork};
use crate::domain::{
    generate_customer_code, Customer, CustomerChanges, CustomerSort, CustomerSortField, Product,
    ProductSort, ProductSortField,
};
use crate::errors::{AppError, AppResult};
use crate::types::{Paginated, PaginationParams};

#[derive(Debug, Clone, Default)]
struct Tables {
    customers: BTreeMap<String, Customer>,
    products: BTreeMap<i32, Product>,
}

impl Tables {
    fn check_customer(&self, candidate: &Customer) -> AppResult<()> {
        let clash = self.customers.values().find(|c| {
            c.id != candidate.id
                && (c.name == candidate.name
                    || c.email == candidate.email
                    || c.cedula == candidate.cedula)
        });
        match clash {
            Some(other) => Err(AppError::conflict(format!("Customer {}", other.id))),
            None => Ok(()),
        }
    }

    fn insert_customer(&mut self, customer: Customer) -> AppResult<()> {
        if self.customers.contains_key(&customer.id) {
            return Err(AppError::conflict(format!("Customer {}", customer.id)));
        }
        self.check_customer(&customer)?;
        self.customers.insert(customer.id.clone(), customer);
        Ok(())
    }

    fn update_customer(&mut self, changes: CustomerChanges) -> AppResult<Customer> {
        let mut updated = self
            .customers
            .get(&changes.id)
            .cloned()
            .ok_or(AppError::NotFound)?;
        changes.apply_to(&mut updated);
        self.check_customer(&updated)?;
        self.customers.insert(updated.id.clone(), updated.clone());
        Ok(updated)
    }

    fn delete_customer(&mut self, id: &str) -> AppResult<()> {
        self.customers
            .remove(id)
            .map(|_| ())
            .ok_or(AppError::NotFound)
    }

    fn insert_product(&mut self, product: Product) -> AppResult<()> {
        if self
            .products
            .values()
            .any(|p| p.id == product.id || p.name == product.name)
        {
            return Err(AppError::conflict(format!("Product {}", product.name)));
        }
        self.products.insert(product.id, product);
        Ok(())
    }

    fn apply(&mut self, write: Write) -> AppResult<()> {
        match write {
            Write::InsertCustomer(customer) => self.insert_customer(customer),
            Write::UpdateCustomer(changes) => self.update_customer(changes).map(|_| ()),
            Write::DeleteCustomer(id) => self.delete_customer(&id),
            Write::InsertProduct(product) => self.insert_product(product),
        }
    }
}

#[derive(Debug, Clone)]
enum Write {
    InsertCustomer(Customer),
    UpdateCustomer(CustomerChanges),
    DeleteCustomer(String),
    InsertProduct(Product),
}

/// Shared in-memory tables plus a journal of every repository call.
#[derive(Debug)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
    next_product_id: AtomicI32,
    journal: Mutex<Vec<String>>,
    fail_commits: AtomicBool,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self {
            tables: RwLock::default(),
            next_product_id: AtomicI32::new(1),
            journal: Mutex::default(),
            fail_commits: AtomicBool::new(false),
        }
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert customers directly, bypassing transactions and the journal.
    pub fn seed_customers(&self, customers: impl IntoIterator<Item = Customer>) -> AppResult<()> {
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        for customer in customers {
            tables.insert_customer(customer)?;
        }
        Ok(())
    }

    /// Every repository and transaction call made so far, in order.
    pub fn operations(&self) -> Vec<String> {
        self.journal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Make every following commit fail, as a lost connection would.
    pub fn fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    pub fn customer_count(&self) -> usize {
        self.read().customers.len()
    }

    pub fn product_count(&self) -> usize {
        self.read().products.len()
    }

    fn record(&self, operation: &str) {
        self.journal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(operation.to_string());
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn snapshot(&self) -> Tables {
        self.read().clone()
    }

    fn commit(&self, writes: Vec<Write>) -> AppResult<()> {
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(AppError::internal("simulated commit failure"));
        }

        let mut live = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        let mut staged = live.clone();
        for write in writes {
            staged.apply(write)?;
        }
        *live = staged;
        Ok(())
    }

    fn customer_exists(
        &self,
        operation: &str,
        excluding_id: Option<&str>,
        matches: impl Fn(&Customer) -> bool,
    ) -> AppResult<bool> {
        self.record(operation);
        Ok(self
            .read()
            .customers
            .values()
            .any(|c| Some(c.id.as_str()) != excluding_id && matches(c)))
    }
}

fn page_of<T>(mut items: Vec<T>, params: PaginationParams) -> Paginated<T> {
    let total = items.len() as u64;
    let offset = usize::try_from(params.offset()).unwrap_or(usize::MAX);
    let page: Vec<T> = if offset >= items.len() {
        Vec::new()
    } else {
        items
            .drain(offset..)
            .take(params.limit() as usize)
            .collect()
    };
    Paginated::new(page, params, total)
}

#[async_trait]
impl CustomerQueries for InMemoryStore {
    async fn customer_name_exists(&self, name: &str, excluding_id: Option<&str>) -> AppResult<bool> {
        self.customer_exists("customer_name_exists", excluding_id, |c| c.name == name)
    }

    async fn customer_email_exists(&self, email: &str, excluding_id: Option<&str>) -> AppResult<bool> {
        self.customer_exists("customer_email_exists", excluding_id, |c| c.email == email)
    }

    async fn customer_cedula_exists(&self, cedula: &str, excluding_id: Option<&str>) -> AppResult<bool> {
        self.customer_exists("customer_cedula_exists", excluding_id, |c| c.cedula == cedula)
    }

    async fn find_customer_by_id(&self, id: &str) -> AppResult<Option<Customer>> {
        self.record("find_customer_by_id");
        Ok(self.read().customers.get(id).cloned())
    }

    async fn find_customer_by_email(&self, email: &str) -> AppResult<Option<Customer>> {
        self.record("find_customer_by_email");
        Ok(self
            .read()
            .customers
            .values()
            .find(|c| c.email == email)
            .cloned())
    }

    async fn list_customers(
        &self,
        params: PaginationParams,
        sort: CustomerSort,
    ) -> AppResult<Paginated<Customer>> {
        self.record("list_customers");
        let mut customers: Vec<Customer> = self.read().customers.values().cloned().collect();
        customers.sort_by(|a, b| {
            let ordering = match sort.field {
                CustomerSortField::Id => a.id.cmp(&b.id),
                CustomerSortField::Name => a.name.cmp(&b.name),
                CustomerSortField::Email => a.email.cmp(&b.email),
                CustomerSortField::Balance => a.current_balance_cents.cmp(&b.current_balance_cents),
            };
            let ordering = if sort.descending { ordering.reverse() } else { ordering };
            ordering.then_with(|| a.id.cmp(&b.id))
        });
        Ok(page_of(customers, params))
    }
}

#[async_trait]
impl ProductQueries for InMemoryStore {
    async fn product_name_exists(&self, name: &str) -> AppResult<bool> {
        self.record("product_name_exists");
        Ok(self.read().products.values().any(|p| p.name == name))
    }

    async fn list_products(
        &self,
        params: PaginationParams,
        sort: ProductSort,
    ) -> AppResult<Paginated<Product>> {
        self.record("list_products");
        let mut products: Vec<Product> = self.read().products.values().cloned().collect();
        products.sort_by(|a, b| {
            let ordering = match sort.field {
                ProductSortField::Id => a.id.cmp(&b.id),
                ProductSortField::Name => a.name.cmp(&b.name),
                ProductSortField::Price => a.unit_price_cents.cmp(&b.unit_price_cents),
                ProductSortField::Stock => a.unit_stock.cmp(&b.unit_stock),
            };
            let ordering = if sort.descending { ordering.reverse() } else { ordering };
            ordering.then_with(|| a.id.cmp(&b.id))
        });
        Ok(page_of(products, params))
    }
}

/// Writes staged by one in-memory transaction
struct InMemoryTransaction<'s> {
    store: &'s InMemoryStore,
    snapshot: Mutex<Tables>,
    writes: Mutex<Vec<Write>>,
}

impl<'s> InMemoryTransaction<'s> {
    fn begin(store: &'s InMemoryStore) -> Self {
        store.record("begin");
        Self {
            store,
            snapshot: Mutex::new(store.snapshot()),
            writes: Mutex::default(),
        }
    }

    /// Apply a write to the snapshot and keep it for commit.
    fn stage<R>(&self, write: Write, apply: impl FnOnce(&mut Tables, Write) -> AppResult<R>) -> AppResult<R> {
        let mut snapshot = self.snapshot.lock().unwrap_or_else(PoisonError::into_inner);
        let result = apply(&mut *snapshot, write.clone())?;
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(write);
        Ok(result)
    }

    fn into_writes(self) -> Vec<Write> {
        self.writes.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl<'s> CustomerCommands for InMemoryTransaction<'s> {
    async fn create_customer(&self, mut customer: Customer) -> AppResult<String> {
        self.store.record("create_customer");
        if customer.id.trim().is_empty() {
            customer.id = generate_customer_code();
        }
        let id = customer.id.clone();
        self.stage(Write::InsertCustomer(customer), |tables, write| tables.apply(write))?;
        Ok(id)
    }

    async fn update_customer(&self, changes: CustomerChanges) -> AppResult<Customer> {
        self.store.record("update_customer");
        self.stage(Write::UpdateCustomer(changes.clone()), |tables, _| {
            tables.update_customer(changes)
        })
    }

    async fn delete_customer(&self, id: &str) -> AppResult<()> {
        self.store.record("delete_customer");
        self.stage(Write::DeleteCustomer(id.to_string()), |tables, write| tables.apply(write))
    }
}

#[async_trait]
impl<'s> ProductCommands for InMemoryTransaction<'s> {
    async fn create_product(&self, mut product: Product) -> AppResult<i32> {
        self.store.record("create_product");
        product.id = self.store.next_product_id.fetch_add(1, Ordering::SeqCst);
        let id = product.id;
        self.stage(Write::InsertProduct(product), |tables, write| tables.apply(write))?;
        Ok(id)
    }
}

/// Unit of work over an [`InMemoryStore`]
#[derive(Debug, Clone, Default)]
pub struct InMemoryPersistence {
    store: Arc<InMemoryStore>,
}

impl InMemoryPersistence {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<InMemoryStore> {
        &self.store
    }
}

#[async_trait]
impl UnitOfWork for InMemoryPersistence {
    fn customers(&self) -> Arc<dyn CustomerQueries> {
        self.store.clone()
    }

    fn products(&self) -> Arc<dyn ProductQueries> {
        self.store.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>
            + Send,
        T: Send,
    {
        let txn = InMemoryTransaction::begin(&self.store);
        let result = f(TransactionContext::new(&txn, &txn)).await;

        match result {
            Ok(value) => match self.store.commit(txn.into_writes()) {
                Ok(()) => {
                    self.store.record("commit");
                    Ok(value)
                }
                Err(e) => {
                    self.store.record("rollback");
                    Err(e)
                }
            },
            Err(e) => {
                self.store.record("rollback");
                Err(e)
            }
        }
    }
}

/// Domain logger that keeps entries in memory and mirrors them to `tracing`.
#[derive(Debug, Default)]
pub struct InMemoryDomainLogger {
    entries: Mutex<Vec<DomainLog>>,
}

impl InMemoryDomainLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<DomainLog> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries().into_iter().map(|e| e.message).collect()
    }
}

#[async_trait]
impl DomainLogger for InMemoryDomainLogger {
    async fn log_information(&self, entry: DomainLog) {
        tracing::info!(user = %entry.user_name, "{}", entry.message);
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::with_transaction;

    fn customer(id: &str, n: u32) -> Customer {
        Customer {
            id: id.to_string(),
            name: format!("Customer {}", n),
            current_balance_cents: i64::from(n) * 100,
            email: format!("c{}@demo.com", n),
            cedula: format!("{:010}", n),
            hashed_password: "digest".to_string(),
            profile_picture: None,
        }
    }

    #[tokio::test]
    async fn test_commit_publishes_writes() {
        let uow = InMemoryPersistence::default();

        let id = with_transaction!(uow, |ctx| ctx
            .customers()
            .create_customer(customer("", 1))
            .await)
        .unwrap();

        assert_eq!(id.len(), 10);
        assert!(uow.store().find_customer_by_id(&id).await.unwrap().is_some());
        assert_eq!(
            uow.store().operations(),
            vec!["begin", "create_customer", "commit", "find_customer_by_id"]
        );
    }

    #[tokio::test]
    async fn test_error_in_closure_discards_writes() {
        let uow = InMemoryPersistence::default();

        let result: AppResult<()> = with_transaction!(uow, |ctx| {
            ctx.customers().create_customer(customer("AAAAA", 1)).await?;
            Err(AppError::internal("abort"))
        });

        assert!(result.is_err());
        assert_eq!(uow.store().customer_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_commit_discards_writes() {
        let uow = InMemoryPersistence::default();
        uow.store().fail_commits(true);

        let result = with_transaction!(uow, |ctx| ctx
            .customers()
            .create_customer(customer("AAAAA", 1))
            .await);

        assert!(result.is_err());
        assert_eq!(uow.store().customer_count(), 0);
        assert_eq!(uow.store().operations().last().map(String::as_str), Some("rollback"));
    }

    #[tokio::test]
    async fn test_unique_columns_enforced() {
        let uow = InMemoryPersistence::default();
        uow.store().seed_customers([customer("AAAAA", 1)]).unwrap();

        let mut duplicate = customer("BBBBB", 2);
        duplicate.email = "c1@demo.com".to_string();
        let result = with_transaction!(uow, |ctx| ctx
            .customers()
            .create_customer(duplicate)
            .await);

        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(uow.store().customer_count(), 1);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_customer() {
        let uow = InMemoryPersistence::default();

        let update = with_transaction!(uow, |ctx| ctx
            .customers()
            .update_customer(CustomerChanges {
                id: "NOPE".to_string(),
                name: "x".to_string(),
                current_balance_cents: 0,
                email: "x@demo.com".to_string(),
                cedula: "1".to_string(),
                hashed_password: None,
                profile_picture: None,
            })
            .await);
        let delete = with_transaction!(uow, |ctx| ctx.customers().delete_customer("NOPE").await);

        assert!(matches!(update, Err(AppError::NotFound)));
        assert!(matches!(delete, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_list_sorts_and_pages() {
        let store = InMemoryStore::new();
        store
            .seed_customers((1..=25).map(|n| customer(&format!("C{:04}", n), n)))
            .unwrap();

        let page = store
            .list_customers(
                PaginationParams::new(3, 10),
                CustomerSort {
                    field: CustomerSortField::Balance,
                    descending: true,
                },
            )
            .await
            .unwrap();

        assert_eq!(page.items.len(), 5);
        assert_eq!(page.items[0].id, "C0005");
        assert!(!page.meta.has_next_page);

        let beyond = store
            .list_customers(PaginationParams::new(4, 10), CustomerSort::default())
            .await
            .unwrap();
        assert!(beyond.items.is_empty());
        assert!(!beyond.meta.has_next_page);
    }

    #[tokio::test]
    async fn test_products_get_sequential_ids() {
        let uow = InMemoryPersistence::default();
        let product = |name: &str| Product {
            id: 0,
            name: name.to_string(),
            unit_stock: 10,
            unit_price_cents: 1800,
        };

        let first = with_transaction!(uow, |ctx| ctx.products().create_product(product("Chai")).await)
            .unwrap();
        let second = with_transaction!(uow, |ctx| ctx.products().create_product(product("Chang")).await)
            .unwrap();

        assert_eq!((first, second), (1, 2));
        assert!(uow.store().product_name_exists("Chang").await.unwrap());
    }
}
