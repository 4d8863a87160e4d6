//! Customer self-service handlers: sign-up and login.

use axum::{extract::State, response::Json, routing::post, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::customer_handler::CustomerCreated;
use crate::api::extractors::{Payload, ValidatedJson};
use crate::api::AppState;
use crate::domain::CreateCustomer;
use crate::errors::AppResult;
use crate::services::TokenResponse;
use crate::types::Created;

/// Customer login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "alfreds@demo.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "Pass123!")]
    pub password: String,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Register a new customer
#[utoipa::path(
    post,
    path = "/api/customers/register",
    tag = "Authentication",
    request_body = CreateCustomer,
    responses(
        (status = 201, description = "Customer registered", body = CustomerCreated),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Customer already exists")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Payload(payload): Payload<CreateCustomer>,
) -> AppResult<Created<CustomerCreated>> {
    let id = state.customer_service.register_customer(payload).await?;

    Ok(Created(CustomerCreated { id }))
}

/// Login and get JWT token
#[utoipa::path(
    post,
    path = "/api/customers/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .auth_service
        .login(payload.email, payload.password)
        .await?;

    Ok(Json(token))
}
