//! Domain layer - Core business entities and logic
//!
//! Entities, request/response DTOs, credential hashing and the
//! business-rule validation framework. No persistence concerns live here.

pub mod customer;
pub mod image;
pub mod password;
pub mod performance;
pub mod principal;
pub mod product;
pub mod validation;

pub use customer::{
    generate_customer_code, CreateCustomer, Customer, CustomerChanges, CustomerResponse,
    CustomerSort, CustomerSortField, GetCustomersQuery, UpdateCustomer,
};
pub use image::{decode_profile_picture, encode_profile_picture};
pub use password::{sha256_digest, CredentialHasher, HashScheme};
pub use performance::{PerformanceReport, PerformanceRequest};
pub use principal::{authenticated, authorize, Principal, Role, READER_ROLES, WRITER_ROLES};
pub use product::{
    CreateProduct, GetProductsQuery, Product, ProductResponse, ProductSort, ProductSortField,
};
pub use validation::{
    FieldRules, ModelValidator, ValidationConstraint, ValidationError, ValidationErrors,
    ValidatorHub,
};
