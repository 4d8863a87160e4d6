//! Product domain entity and related types.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::types::{default_page_number, default_page_size, PaginationParams};

/// Product domain entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// Server-assigned identity; zero until stored
    pub id: i32,
    pub name: String,
    pub unit_stock: i16,
    /// Price in cents
    pub unit_price_cents: i64,
}

/// Product creation data transfer object
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 40, message = "Name must be between 1 and 40 characters"))]
    #[schema(example = "Chai")]
    pub name: String,
    #[schema(example = 39)]
    pub unit_stock: i16,
    #[schema(example = 1800)]
    pub unit_price_cents: i64,
}

/// Product response
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Chai")]
    pub name: String,
    #[schema(example = 39)]
    pub unit_stock: i16,
    #[schema(example = 1800)]
    pub unit_price_cents: i64,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            unit_stock: product.unit_stock,
            unit_price_cents: product.unit_price_cents,
        }
    }
}

/// Columns a product listing can be ordered by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProductSortField {
    Id,
    #[default]
    Name,
    Price,
    Stock,
}

/// Product listing query
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GetProductsQuery {
    /// 1-based page number
    #[serde(default = "default_page_number")]
    pub page_number: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    #[serde(default)]
    pub order_by: Option<ProductSortField>,
    #[serde(default)]
    pub order_descending: bool,
}

impl GetProductsQuery {
    pub fn new(page_number: u64, page_size: u64) -> Self {
        Self {
            page_number,
            page_size,
            order_by: None,
            order_descending: false,
        }
    }

    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page_number, self.page_size)
    }

    pub fn sort(&self) -> ProductSort {
        ProductSort {
            field: self.order_by.unwrap_or_default(),
            descending: self.order_descending,
        }
    }
}

/// Resolved ordering for a product listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductSort {
    pub field: ProductSortField,
    pub descending: bool,
}
