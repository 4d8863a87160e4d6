//! Customer handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Extension, Router,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::extractors::Payload;
use crate::api::AppState;
use crate::domain::{
    authorize, CreateCustomer, CustomerResponse, GetCustomersQuery, Principal, UpdateCustomer,
    READER_ROLES, WRITER_ROLES,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::types::{ApiResponse, Created, NoContent, Paginated};

/// Identity of a newly created customer
#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerCreated {
    #[schema(example = "BLAUS")]
    pub id: String,
}

/// Create customer routes
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route(
            "/:id",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
}

/// Create a customer
#[utoipa::path(
    post,
    path = "/api/customers",
    tag = "Customers",
    request_body = CreateCustomer,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Customer created", body = CustomerCreated),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Role not allowed")
    )
)]
pub async fn create_customer(
    State(state): State<AppState>,
    principal: Option<Extension<Principal>>,
    Payload(payload): Payload<CreateCustomer>,
) -> AppResult<Created<CustomerCreated>> {
    let principal = authorize(principal.as_deref(), WRITER_ROLES)?;

    let id = state
        .customer_service
        .create_customer(Some(principal), payload)
        .await?;

    Ok(Created(CustomerCreated { id }))
}

/// List customers, one page at a time
#[utoipa::path(
    get,
    path = "/api/customers",
    tag = "Customers",
    params(GetCustomersQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "A page of customers", body = [CustomerResponse]),
        (status = 400, description = "Invalid paging parameters"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Role not allowed")
    )
)]
pub async fn list_customers(
    State(state): State<AppState>,
    principal: Option<Extension<Principal>>,
    Query(query): Query<GetCustomersQuery>,
) -> AppResult<Json<ApiResponse<Paginated<CustomerResponse>>>> {
    let principal = authorize(principal.as_deref(), READER_ROLES)?;

    let page = state
        .customer_service
        .get_customers(Some(principal), query)
        .await?;

    Ok(Json(ApiResponse::success(page.map(CustomerResponse::from))))
}

/// Get a customer by code
#[utoipa::path(
    get,
    path = "/api/customers/{id}",
    tag = "Customers",
    params(("id" = String, Path, description = "Customer code")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Customer found", body = CustomerResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Role not allowed"),
        (status = 404, description = "Customer not found")
    )
)]
pub async fn get_customer(
    State(state): State<AppState>,
    principal: Option<Extension<Principal>>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<CustomerResponse>>> {
    let principal = authorize(principal.as_deref(), READER_ROLES)?;

    let customer = state
        .customer_service
        .get_customer_by_id(Some(principal), &id)
        .await?
        .ok_or_not_found()?;

    Ok(Json(ApiResponse::success(CustomerResponse::from(customer))))
}

/// Replace a customer's details
#[utoipa::path(
    put,
    path = "/api/customers/{id}",
    tag = "Customers",
    params(("id" = String, Path, description = "Customer code")),
    request_body = UpdateCustomer,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Customer updated", body = CustomerResponse),
        (status = 400, description = "Validation error or code mismatch"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Role not allowed"),
        (status = 404, description = "Customer not found")
    )
)]
pub async fn update_customer(
    State(state): State<AppState>,
    principal: Option<Extension<Principal>>,
    Path(id): Path<String>,
    Payload(payload): Payload<UpdateCustomer>,
) -> AppResult<Json<ApiResponse<CustomerResponse>>> {
    let principal = authorize(principal.as_deref(), WRITER_ROLES)?;

    if payload.customer_id != id {
        return Err(AppError::bad_request(
            "Customer code in the path does not match the request body",
        ));
    }

    let customer = state
        .customer_service
        .update_customer(Some(principal), payload)
        .await?;

    Ok(Json(ApiResponse::with_message(
        CustomerResponse::from(customer),
        "Customer updated",
    )))
}

/// Delete a customer
#[utoipa::path(
    delete,
    path = "/api/customers/{id}",
    tag = "Customers",
    params(("id" = String, Path, description = "Customer code")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Customer deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Role not allowed"),
        (status = 404, description = "Customer not found")
    )
)]
pub async fn delete_customer(
    State(state): State<AppState>,
    principal: Option<Extension<Principal>>,
    Path(id): Path<String>,
) -> AppResult<NoContent> {
    let principal = authorize(principal.as_deref(), WRITER_ROLES)?;

    state
        .customer_service
        .delete_customer(Some(principal), &id)
        .await?;

    Ok(NoContent)
}
