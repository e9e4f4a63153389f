//! crates/text_intelligence_core/src/validation.rs
//!
//! Normalizes analysis input and query options before they reach the provider.

use crate::domain::{
    AnalysisInput, AnalysisOptions, AnalysisParams, AnalysisRequest, Summarize, DEFAULT_LANGUAGE,
};

/// A rejected analysis request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Request must contain either 'text' or 'url' field")]
    MissingInput,
    #[error("Request must contain either 'text' or 'url', not both")]
    AmbiguousInput,
    #[error("Invalid URL format")]
    InvalidUrl,
    #[error("Text content cannot be empty")]
    EmptyText,
    #[error("Summarization v1 is no longer supported. Please use v2 or true.")]
    LegacySummarize,
    /// The body could not be decoded at all.
    #[error("Invalid request body: {0}")]
    MalformedBody(String),
    /// The query string could not be decoded at all.
    #[error("Invalid query string: {0}")]
    MalformedQuery(String),
}

impl ValidationError {
    /// The machine-readable code reported to clients.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::InvalidUrl => "INVALID_URL",
            _ => "INVALID_TEXT",
        }
    }
}

/// Checks that exactly one of `text` or `url` is usable.
///
/// Empty strings count as absent. Rules are applied in a fixed order so the
/// first failing rule decides the error.
pub fn validate(input: &AnalysisInput) -> Result<AnalysisRequest, ValidationError> {
    let text = input.text.as_deref().filter(|t| !t.is_empty());
    let url = input.url.as_deref().filter(|u| !u.is_empty());

    match (text, url) {
        (None, None) => Err(ValidationError::MissingInput),
        (Some(_), Some(_)) => Err(ValidationError::AmbiguousInput),
        (None, Some(url)) => {
            if url.starts_with("http://") || url.starts_with("https://") {
                Ok(AnalysisRequest::Url(url.to_string()))
            } else {
                Err(ValidationError::InvalidUrl)
            }
        }
        (Some(text), None) => {
            if text.trim().is_empty() {
                Err(ValidationError::EmptyText)
            } else {
                Ok(AnalysisRequest::Text(text.to_string()))
            }
        }
    }
}

/// Converts query parameters into provider options.
pub fn build_options(params: &AnalysisParams) -> Result<AnalysisOptions, ValidationError> {
    let summarize = match params.summarize.as_deref() {
        Some("true") => Some(Summarize::Enabled),
        Some("v2") => Some(Summarize::V2),
        Some("v1") => return Err(ValidationError::LegacySummarize),
        _ => None,
    };

    Ok(AnalysisOptions {
        language: params
            .language
            .clone()
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
        summarize,
        topics: is_enabled(&params.topics),
        sentiment: is_enabled(&params.sentiment),
        intents: is_enabled(&params.intents),
    })
}

// Only the literal "true" turns a feature on.
fn is_enabled(flag: &Option<String>) -> bool {
    flag.as_deref() == Some("true")
}
