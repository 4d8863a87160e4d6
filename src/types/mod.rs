//! Shared types: pagination and response envelopes.

mod pagination;
mod response;

pub use pagination::{
    default_page_number, default_page_size, Paginated, PaginationMeta, PaginationParams,
};
pub use response::{ApiResponse, Created, NoContent};
