//! Product repositories.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, NotSet,
    Order, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use super::entities::product::{self, ActiveModel, Entity as ProductEntity};
use crate::domain::{Product, ProductSort, ProductSortField};
use crate::errors::{AppError, AppResult};
use crate::types::{Paginated, PaginationParams};

/// Read-side product repository
#[async_trait]
pub trait ProductQueries: Send + Sync {
    async fn product_name_exists(&self, name: &str) -> AppResult<bool>;

    async fn list_products(
        &self,
        params: PaginationParams,
        sort: ProductSort,
    ) -> AppResult<Paginated<Product>>;
}

/// Write-side product repository, bound to one transaction
#[async_trait]
pub trait ProductCommands: Send + Sync {
    /// Insert a product and return its assigned identity
    async fn create_product(&self, product: Product) -> AppResult<i32>;
}

/// SeaORM-backed product queries
pub struct ProductStore {
    db: DatabaseConnection,
}

impl ProductStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn sort_column(field: ProductSortField) -> product::Column {
    match field {
        ProductSortField::Id => product::Column::Id,
        ProductSortField::Name => product::Column::Name,
        ProductSortField::Price => product::Column::UnitPriceCents,
        ProductSortField::Stock => product::Column::UnitStock,
    }
}

#[async_trait]
impl ProductQueries for ProductStore {
    async fn product_name_exists(&self, name: &str) -> AppResult<bool> {
        let count = ProductEntity::find()
            .filter(product::Column::Name.eq(name))
            .count(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(count > 0)
    }

    async fn list_products(
        &self,
        params: PaginationParams,
        sort: ProductSort,
    ) -> AppResult<Paginated<Product>> {
        let order = if sort.descending { Order::Desc } else { Order::Asc };
        let paginator = ProductEntity::find()
            .order_by(sort_column(sort.field), order)
            .order_by_asc(product::Column::Id)
            .paginate(&self.db, params.limit());

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.page_number.saturating_sub(1)).await?;

        Ok(Paginated::new(
            models.into_iter().map(Product::from).collect(),
            params,
            total,
        ))
    }
}

/// Transaction-aware product commands
pub struct TxProductStore<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxProductStore<'a> {
    pub fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }
}

#[async_trait]
impl<'a> ProductCommands for TxProductStore<'a> {
    async fn create_product(&self, product: Product) -> AppResult<i32> {
        let active_model = ActiveModel {
            id: NotSet,
            name: Set(product.name),
            unit_stock: Set(product.unit_stock),
            unit_price_cents: Set(product.unit_price_cents),
        };

        let model = active_model.insert(self.txn).await?;
        Ok(model.id)
    }
}
