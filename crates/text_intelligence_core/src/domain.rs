//! crates/text_intelligence_core/src/domain.rs
//!
//! Defines the core data structures that flow between the web layer and the
//! text analysis provider. Wire shapes (`AnalysisInput`, `AnalysisParams`) are
//! kept separate from their validated counterparts.

use serde::{Serialize, Serializer};

/// Language used when the caller does not ask for one.
pub const DEFAULT_LANGUAGE: &str = "en";

//=========================================================================================
// Raw Input
//=========================================================================================

/// The body of an analysis request before validation.
#[derive(Debug, Clone, Default)]
pub struct AnalysisInput {
    pub text: Option<String>,
    pub url: Option<String>,
}

/// Query parameters of an analysis request before validation.
#[derive(Debug, Clone, Default)]
pub struct AnalysisParams {
    pub language: Option<String>,
    pub summarize: Option<String>,
    pub topics: Option<String>,
    pub sentiment: Option<String>,
    pub intents: Option<String>,
}

//=========================================================================================
// Validated Request and Options
//=========================================================================================

/// A validated analysis request: exactly one of text or a remote URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisRequest {
    Text(String),
    Url(String),
}

/// Which summarization mode the provider should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Summarize {
    /// The provider's default summarizer (`summarize=true`).
    Enabled,
    /// The second-generation summarizer (`summarize=v2`).
    V2,
}

impl Serialize for Summarize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Summarize::Enabled => serializer.serialize_bool(true),
            Summarize::V2 => serializer.serialize_str("v2"),
        }
    }
}

/// Options forwarded to the provider alongside the request.
///
/// Serializes to the provider's query-string form: disabled features are
/// omitted entirely rather than sent as `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisOptions {
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summarize: Option<Summarize>,
    #[serde(skip_serializing_if = "is_false")]
    pub topics: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub sentiment: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub intents: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            summarize: None,
            topics: false,
            sentiment: false,
            intents: false,
        }
    }
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

/// The provider's `results` object, passed back to the client untouched.
pub type AnalysisResults = serde_json::Map<String, serde_json::Value>;
