//! services/api/src/web/middleware.rs
//!
//! Session-token gate for protected routes and `X-Request-Id` propagation.

use axum::{
    extract::{Request, State},
    http::{header, HeaderName},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::web::{errors::HttpError, state::AppState};

pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Middleware that validates the `Authorization: Bearer` session token.
///
/// If valid, inserts the token's claims into request extensions for handlers to use.
/// If missing, invalid or expired, returns 401 with an `AuthenticationError` body.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, HttpError> {
    // Any scheme other than Bearer counts as no token at all.
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let claims = state.sessions.verify(token)?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Copies the caller's `X-Request-Id` header onto the response, whatever its status.
pub async fn echo_request_id(req: Request, next: Next) -> Response {
    let request_id = req.headers().get(&X_REQUEST_ID).cloned();

    let mut response = next.run(req).await;
    if let Some(id) = request_id {
        response.headers_mut().insert(X_REQUEST_ID.clone(), id);
    }
    response
}
