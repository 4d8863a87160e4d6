//! Pagination types for list endpoints.

use serde::Serialize;

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_NUMBER, MAX_PAGE_SIZE};
use crate::domain::ValidationErrors;

pub fn default_page_number() -> u64 {
    DEFAULT_PAGE_NUMBER
}

pub fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

/// Requested page, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationParams {
    pub page_number: u64,
    pub page_size: u64,
}

impl PaginationParams {
    pub fn new(page_number: u64, page_size: u64) -> Self {
        Self {
            page_number,
            page_size,
        }
    }

    /// Calculate offset for database query
    pub fn offset(&self) -> u64 {
        self.page_number.saturating_sub(1).saturating_mul(self.page_size)
    }

    /// Get limit capped at maximum
    pub fn limit(&self) -> u64 {
        self.page_size.min(MAX_PAGE_SIZE)
    }

    /// Page number within `1..=MAX_PAGE_NUMBER` and page size within `1..=MAX_PAGE_SIZE`.
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.page_number < 1 || self.page_number > MAX_PAGE_NUMBER {
            errors.push(
                "page_number",
                format!("Page number must be between 1 and {}", MAX_PAGE_NUMBER),
            );
        }
        if self.page_size < 1 || self.page_size > MAX_PAGE_SIZE {
            errors.push(
                "page_size",
                format!("Page size must be between 1 and {}", MAX_PAGE_SIZE),
            );
        }
        errors
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page_number: DEFAULT_PAGE_NUMBER,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results plus its metadata
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    #[serde(flatten)]
    pub meta: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    pub page_number: u64,
    pub page_size: u64,
    pub total_count: u64,
    pub total_pages: u64,
    pub has_next_page: bool,
}

impl<T> Paginated<T> {
    /// Create new paginated response
    pub fn new(items: Vec<T>, params: PaginationParams, total_count: u64) -> Self {
        let total_pages = if params.page_size > 0 {
            total_count.div_ceil(params.page_size)
        } else {
            0
        };

        Self {
            items,
            meta: PaginationMeta {
                page_number: params.page_number,
                page_size: params.page_size,
                total_count,
                total_pages,
                has_next_page: params.page_number < total_pages,
            },
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}
