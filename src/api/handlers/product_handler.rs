//! Product handlers.

use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Extension, Router,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::extractors::Payload;
use crate::api::AppState;
use crate::domain::{
    authorize, CreateProduct, GetProductsQuery, Principal, ProductResponse, READER_ROLES,
    WRITER_ROLES,
};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created, Paginated};

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductCreated {
    #[schema(example = 1)]
    pub id: i32,
}

pub fn product_routes() -> Router<AppState> {
    Router::new().route("/", get(list_products).post(create_product))
}

/// Create a product
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Products",
    request_body = CreateProduct,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Product created", body = ProductCreated),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Role not allowed")
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    principal: Option<Extension<Principal>>,
    Payload(payload): Payload<CreateProduct>,
) -> AppResult<Created<ProductCreated>> {
    let principal = authorize(principal.as_deref(), WRITER_ROLES)?;

    let id = state
        .product_service
        .create_product(Some(principal), payload)
        .await?;

    Ok(Created(ProductCreated { id }))
}

/// List products, one page at a time
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Products",
    params(GetProductsQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "A page of products", body = [ProductResponse]),
        (status = 400, description = "Invalid paging parameters"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Role not allowed")
    )
)]
pub async fn list_products(
    State(state): State<AppState>,
    principal: Option<Extension<Principal>>,
    Query(query): Query<GetProductsQuery>,
) -> AppResult<Json<ApiResponse<Paginated<ProductResponse>>>> {
    let principal = authorize(principal.as_deref(), READER_ROLES)?;

    let page = state
        .product_service
        .get_products(Some(principal), query)
        .await?;

    Ok(Json(ApiResponse::success(page.map(ProductResponse::from))))
}
