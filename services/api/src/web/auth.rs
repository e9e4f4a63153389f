//! services/api/src/web/auth.rs
//!
//! Session endpoints: the page that hands out a nonce, and the exchange of
//! that nonce for a session token.

use axum::{
    extract::State,
    http::HeaderMap,
    response::{Html, IntoResponse},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;
use utoipa::ToSchema;

use crate::web::{errors::HttpError, state::AppState};

const NONCE_HEADER: &str = "x-session-nonce";
const FRONTEND_MISSING: &str = "Frontend not built. Run make build first.";

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct SessionResponse {
    /// Bearer token for the protected endpoints, valid for one hour.
    pub token: String,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET / - Serve the frontend with a fresh session nonce
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "index.html with a session-nonce meta tag"),
        (status = 404, description = "Frontend not built")
    )
)]
pub async fn index_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let template = state
        .index_template
        .as_deref()
        .ok_or_else(|| HttpError::NotFound(FRONTEND_MISSING.to_string()))?;

    // 1. Opportunistic cleanup instead of a background timer
    let swept = state.nonces.sweep();
    if swept > 0 {
        debug!(swept, "Removed expired session nonces");
    }

    // 2. Issue and embed a new nonce
    let nonce = state.nonces.issue();
    Ok(Html(inject_nonce(template, &nonce)))
}

/// GET /api/session - Exchange a page nonce for a session token
#[utoipa::path(
    get,
    path = "/api/session",
    responses(
        (status = 200, description = "Session issued", body = SessionResponse),
        (status = 403, description = "Missing, used or expired nonce")
    ),
    params(
        ("X-Session-Nonce" = Option<String>, Header, description = "Nonce from the served page. Required when SESSION_SECRET is set.")
    )
)]
pub async fn session_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<SessionResponse>, HttpError> {
    let nonce = headers.get(NONCE_HEADER).and_then(|v| v.to_str().ok());

    let token = state.sessions.issue(nonce)?;

    Ok(Json(SessionResponse {
        token: token.into_string(),
    }))
}

/// Places a `session-nonce` meta tag just before `</head>`.
fn inject_nonce(template: &str, nonce: &str) -> String {
    template.replace(
        "</head>",
        &format!("<meta name=\"session-nonce\" content=\"{}\">\n</head>", nonce),
    )
}
