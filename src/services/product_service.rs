//! Product service - Product catalogue use cases.

use async_trait::async_trait;
use std::sync::Arc;

use super::rules::ProductRules;
use crate::domain::{
    authenticated, CreateProduct, FieldRules, GetProductsQuery, Principal, Product, ValidatorHub,
};
use crate::errors::AppResult;
use crate::infra::{DomainLog, DomainLogger, UnitOfWork};
use crate::types::Paginated;
use crate::with_transaction;

#[async_trait]
pub trait ProductService: Send + Sync {
    /// Create a product and return its assigned id
    async fn create_product(
        &self,
        principal: Option<&Principal>,
        request: CreateProduct,
    ) -> AppResult<i32>;

    async fn get_products(
        &self,
        principal: Option<&Principal>,
        query: GetProductsQuery,
    ) -> AppResult<Paginated<Product>>;
}

pub struct ProductManager<U: UnitOfWork> {
    uow: Arc<U>,
    logger: Arc<dyn DomainLogger>,
    rules: ValidatorHub<CreateProduct>,
}

impl<U: UnitOfWork> ProductManager<U> {
    pub fn new(uow: Arc<U>, logger: Arc<dyn DomainLogger>) -> Self {
        let rules = ValidatorHub::new()
            .with(FieldRules)
            .with(ProductRules::new(uow.products()));
        Self { uow, logger, rules }
    }
}

#[async_trait]
impl<U: UnitOfWork> ProductService for ProductManager<U> {
    async fn create_product(
        &self,
        principal: Option<&Principal>,
        request: CreateProduct,
    ) -> AppResult<i32> {
        let principal = authenticated(principal)?;
        self.rules.guard(&request).await?;

        let name = request.name.clone();
        self.logger
            .log_information(DomainLog::new(
                format!("Starting creation of product '{}'", name),
                &principal.name,
            ))
            .await;

        let product = Product {
            id: 0,
            name: request.name,
            unit_stock: request.unit_stock,
            unit_price_cents: request.unit_price_cents,
        };
        let result = with_transaction!(self.uow, |ctx| ctx
            .products()
            .create_product(product)
            .await);

        let message = match &result {
            Ok(id) => format!("Product {} created", id),
            Err(_) => format!("Creation of product '{}' cancelled", name),
        };
        self.logger
            .log_information(DomainLog::new(message, &principal.name))
            .await;

        result
    }

    async fn get_products(
        &self,
        principal: Option<&Principal>,
        query: GetProductsQuery,
    ) -> AppResult<Paginated<Product>> {
        authenticated(principal)?;
        let params = query.pagination();
        params.validate().into_result()?;

        self.uow.products().list_products(params, query.sort()).await
    }
}
