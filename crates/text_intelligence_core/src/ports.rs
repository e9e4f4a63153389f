//! crates/text_intelligence_core/src/ports.rs
//!
//! Defines the service contract for the external text analysis provider.
//! The web layer depends only on this trait, so the concrete HTTP adapter can
//! be swapped for a stub in tests.

use async_trait::async_trait;
use crate::domain::{AnalysisOptions, AnalysisRequest, AnalysisResults};

//=========================================================================================
// Port Error and Result Types
//=========================================================================================

/// A failure reported by, or while reaching, the analysis provider.
///
/// Adapters classify provider failures into these variants from structured
/// data (status codes, error codes), never from free-form message text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    /// The provider refused the submitted text.
    #[error("{0}")]
    InvalidText(String),
    /// The provider could not fetch or read the submitted URL.
    #[error("{0}")]
    InvalidUrl(String),
    /// The submitted text exceeds the provider's size limit.
    #[error("{0}")]
    TextTooLong(String),
    /// Any other error returned by the provider.
    #[error("Provider error: {0}")]
    Upstream(String),
    /// The provider could not be reached or its reply could not be read.
    #[error("Transport error: {0}")]
    Transport(String),
}

impl AnalysisError {
    /// The machine-readable code reported to clients.
    pub fn code(&self) -> &'static str {
        match self {
            AnalysisError::InvalidUrl(_) => "INVALID_URL",
            AnalysisError::TextTooLong(_) => "TEXT_TOO_LONG",
            AnalysisError::InvalidText(_)
            | AnalysisError::Upstream(_)
            | AnalysisError::Transport(_) => "INVALID_TEXT",
        }
    }

    /// Whether the failure was caused by the caller's input.
    ///
    /// Client errors may be reported verbatim; anything else is hidden behind a
    /// generic message.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AnalysisError::InvalidText(_)
                | AnalysisError::InvalidUrl(_)
                | AnalysisError::TextTooLong(_)
        )
    }
}

/// A convenience type alias for `Result<T, AnalysisError>`.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait TextAnalysisService: Send + Sync {
    /// Runs the requested analyses and returns the provider's `results` object.
    async fn analyze(
        &self,
        request: &AnalysisRequest,
        options: &AnalysisOptions,
    ) -> AnalysisResult<AnalysisResults>;
}
