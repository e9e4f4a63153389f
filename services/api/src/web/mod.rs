pub mod auth;
pub mod errors;
pub mod middleware;
pub mod rest;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use auth::{index_handler, session_handler};
pub use middleware::{echo_request_id, require_session};
pub use rest::{analyze_handler, health_handler, metadata_handler, ApiDoc};
pub use state::AppState;

/// Builds the complete application router around `app_state`.
pub fn build_router(app_state: Arc<AppState>) -> Router {
    // Public routes (no session required)
    let public_routes = Router::new()
        .route("/", get(index_handler))
        .route("/api/session", get(session_handler))
        .route("/api/metadata", get(metadata_handler))
        .route("/health", get(health_handler));

    // Protected routes (session token required)
    let protected_routes = Router::new()
        .route("/api/text-intelligence", post(analyze_handler))
        .route("/text-intelligence/analyze", post(analyze_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_session,
        ));

    let api_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .with_state(app_state);

    Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        // Outermost, so preflight answers from the CORS layer are tagged too.
        .layer(axum_middleware::from_fn(echo_request_id))
}
