//! Session middleware and the `Principal` extractor.
//!
//! The middleware runs on every request. A valid bearer token attaches the
//! caller's `Principal` to the request extensions; a missing, forged or
//! revoked token leaves the request anonymous. Handlers that need a caller
//! take `Principal` (401 when absent) or `Option<Principal>`.

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::policy::Principal;
use crate::state::AppState;

/// Token from `Authorization: Bearer <token>`, if present and well formed.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Resolves the bearer token to a `Principal`.
///
/// # Errors
/// Only storage failures abort the request; authentication failures do not.
///
/// # Example
/// ```ignore
/// Router::new()
///     .route("/protected", get(handler))
///     .layer(middleware::from_fn_with_state(state.clone(), session_middleware))
/// ```
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(token) = bearer_token(request.headers()).map(str::to_owned) {
        match state.services.auth.authenticate(&token).await {
            Ok(principal) => {
                request.extensions_mut().insert(principal);
            }
            Err(AppError::Unauthorized { .. }) => {
                tracing::debug!("Request carries an invalid or revoked session token");
            }
            Err(e) => return Err(e),
        }
    }

    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized("unauthorized"))
    }
}

impl<S> OptionalFromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<Principal>().cloned())
    }
}
