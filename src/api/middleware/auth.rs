//! JWT authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::errors::AppError;

/// JWT authentication middleware.
///
/// A request without an Authorization header passes through anonymously and
/// the use case decides. A header that is not a valid bearer token is
/// rejected. A valid token injects its [`Principal`](crate::domain::Principal)
/// into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(auth_header) = request.headers().get(AUTHORIZATION) else {
        return Ok(next.run(request).await);
    };

    let token = auth_header
        .to_str()
        .ok()
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .ok_or(AppError::Unauthenticated)?;

    let claims = state.auth_service.verify_token(token)?;
    let principal = claims.principal()?;

    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}
