//! Performance run handlers.

use axum::{extract::State, response::Json, routing::post, Extension, Router};

use crate::api::extractors::Payload;
use crate::api::AppState;
use crate::domain::{
    authorize, PerformanceReport, PerformanceRequest, Principal, READER_ROLES, WRITER_ROLES,
};
use crate::errors::AppResult;

pub fn performance_routes() -> Router<AppState> {
    Router::new()
        .route("/customers/insert", post(insert_customers))
        .route("/customers/select", post(select_customers))
        .route("/products/insert", post(insert_products))
        .route("/products/select", post(select_products))
}

/// Insert random customers and time it
#[utoipa::path(
    post,
    path = "/api/performance/customers/insert",
    tag = "Performance",
    request_body = PerformanceRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Run finished", body = PerformanceReport),
        (status = 400, description = "Quantity out of range"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Role not allowed")
    )
)]
pub async fn insert_customers(
    State(state): State<AppState>,
    principal: Option<Extension<Principal>>,
    Payload(payload): Payload<PerformanceRequest>,
) -> AppResult<Json<PerformanceReport>> {
    let principal = authorize(principal.as_deref(), WRITER_ROLES)?;
    let report = state
        .performance_service
        .insert_customers(Some(principal), payload.quantity)
        .await?;
    Ok(Json(report))
}

/// Page through customers and time it
#[utoipa::path(
    post,
    path = "/api/performance/customers/select",
    tag = "Performance",
    request_body = PerformanceRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Run finished", body = PerformanceReport),
        (status = 400, description = "Quantity out of range"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Role not allowed")
    )
)]
pub async fn select_customers(
    State(state): State<AppState>,
    principal: Option<Extension<Principal>>,
    Payload(payload): Payload<PerformanceRequest>,
) -> AppResult<Json<PerformanceReport>> {
    let principal = authorize(principal.as_deref(), READER_ROLES)?;
    let report = state
        .performance_service
        .select_customers(Some(principal), payload.quantity)
        .await?;
    Ok(Json(report))
}

/// Insert random products and time it
#[utoipa::path(
    post,
    path = "/api/performance/products/insert",
    tag = "Performance",
    request_body = PerformanceRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Run finished", body = PerformanceReport),
        (status = 400, description = "Quantity out of range"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Role not allowed")
    )
)]
pub async fn insert_products(
    State(state): State<AppState>,
    principal: Option<Extension<Principal>>,
    Payload(payload): Payload<PerformanceRequest>,
) -> AppResult<Json<PerformanceReport>> {
    let principal = authorize(principal.as_deref(), WRITER_ROLES)?;
    let report = state
        .performance_service
        .insert_products(Some(principal), payload.quantity)
        .await?;
    Ok(Json(report))
}

/// Page through products and time it
#[utoipa::path(
    post,
    path = "/api/performance/products/select",
    tag = "Performance",
    request_body = PerformanceRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Run finished", body = PerformanceReport),
        (status = 400, description = "Quantity out of range"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Role not allowed")
    )
)]
pub async fn select_products(
    State(state): State<AppState>,
    principal: Option<Extension<Principal>>,
    Payload(payload): Payload<PerformanceRequest>,
) -> AppResult<Json<PerformanceReport>> {
    let principal = authorize(principal.as_deref(), READER_ROLES)?;
    let report = state
        .performance_service
        .select_products(Some(principal), payload.quantity)
        .await?;
    Ok(Json(report))
}
