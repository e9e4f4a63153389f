//! services/api/src/web/errors.rs
//!
//! Maps every request-time failure onto an HTTP status and JSON envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use text_intelligence_core::{AnalysisError, AuthError, ValidationError};
use tracing::{error, warn};

use crate::metadata::MetadataError;

const PROCESSING_FAILED: &str = "Text processing failed";

/// An error returned from a handler or middleware.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Processing(#[from] AnalysisError),
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    #[error("{0}")]
    NotFound(String),
}

impl HttpError {
    pub fn status(&self) -> StatusCode {
        match self {
            HttpError::Auth(AuthError::InvalidNonce) => StatusCode::FORBIDDEN,
            HttpError::Auth(AuthError::Signing(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            HttpError::Auth(_) => StatusCode::UNAUTHORIZED,
            HttpError::Validation(_) => StatusCode::BAD_REQUEST,
            HttpError::Processing(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            HttpError::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            HttpError::Metadata(_) => StatusCode::INTERNAL_SERVER_ERROR,
            HttpError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            HttpError::Auth(e) => {
                warn!(code = e.code(), "Authentication failed: {}", e);
                json!({
                    "error": {
                        "type": "AuthenticationError",
                        "code": e.code(),
                        "message": e.to_string(),
                    }
                })
            }
            HttpError::Validation(e) => json!({
                "error": {
                    "type": "validation_error",
                    "code": e.code(),
                    "message": e.to_string(),
                    "details": {},
                }
            }),
            HttpError::Processing(e) => {
                error!("Text Intelligence Error: {}", e);
                // Provider internals are only exposed for caller-caused failures.
                let message = if e.is_client_error() {
                    e.to_string()
                } else {
                    PROCESSING_FAILED.to_string()
                };
                json!({
                    "error": {
                        "type": "processing_error",
                        "code": e.code(),
                        "message": message,
                        "details": {},
                    }
                })
            }
            HttpError::Metadata(e) => {
                error!("Error reading metadata: {}", e);
                json!({
                    "error": "INTERNAL_SERVER_ERROR",
                    "message": e.to_string(),
                })
            }
            HttpError::NotFound(detail) => json!({ "detail": detail }),
        };

        (status, Json(body)).into_response()
    }
}
