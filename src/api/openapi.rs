//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, customer_handler, performance_handler, product_handler};
use crate::domain::{
    CreateCustomer, CreateProduct, CustomerResponse, CustomerSortField, PerformanceReport,
    PerformanceRequest, ProductResponse, ProductSortField, Role, UpdateCustomer, ValidationError,
};
use crate::services::TokenResponse;

/// OpenAPI documentation for the NorthWind Sales API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "NorthWind Sales API",
        version = "0.1.0",
        description = "Customer and product administration for the NorthWind sales backend",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        auth_handler::register,
        auth_handler::login,
        customer_handler::create_customer,
        customer_handler::list_customers,
        customer_handler::get_customer,
        customer_handler::update_customer,
        customer_handler::delete_customer,
        product_handler::create_product,
        product_handler::list_products,
        performance_handler::insert_customers,
        performance_handler::select_customers,
        performance_handler::insert_products,
        performance_handler::select_products,
    ),
    components(
        schemas(
            Role,
            CreateCustomer,
            UpdateCustomer,
            CustomerResponse,
            CustomerSortField,
            customer_handler::CustomerCreated,
            CreateProduct,
            ProductResponse,
            ProductSortField,
            product_handler::ProductCreated,
            PerformanceRequest,
            PerformanceReport,
            ValidationError,
            auth_handler::LoginRequest,
            TokenResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Customer sign-up and login"),
        (name = "Customers", description = "Customer administration"),
        (name = "Products", description = "Product catalogue"),
        (name = "Performance", description = "Timed bulk insert and read runs")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT issued by /api/customers/login or the token command"))
                        .build(),
                ),
            );
        }
    }
}
