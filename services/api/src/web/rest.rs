//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::metadata::load_meta;
use crate::web::{auth, errors::HttpError, state::AppState};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use text_intelligence_core::{
    build_options, validate, AnalysisInput, AnalysisParams, AnalysisResults, ValidationError,
};
use tracing::info;
use utoipa::{IntoParams, OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Deepgram Text Intelligence API",
        description = "Text analysis powered by Deepgram",
        version = "1.0.0"
    ),
    paths(
        auth::index_handler,
        auth::session_handler,
        analyze_handler,
        health_handler,
        metadata_handler,
    ),
    components(
        schemas(AnalyzeBody, AnalyzeResponse, HealthResponse, auth::SessionResponse)
    ),
    tags(
        (name = "Text Intelligence API", description = "Summarization, topics, sentiment and intents for text or URLs.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// The body of an analysis request. Exactly one field must be set.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AnalyzeBody {
    pub text: Option<String>,
    pub url: Option<String>,
}

impl From<AnalyzeBody> for AnalysisInput {
    fn from(body: AnalyzeBody) -> Self {
        AnalysisInput {
            text: body.text,
            url: body.url,
        }
    }
}

/// Feature switches. Boolean features are enabled only by the literal `true`.
#[derive(Debug, Default, PartialEq, Eq, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AnalyzeQuery {
    /// Language of the input (default `en`).
    pub language: Option<String>,
    /// `true` or `v2`. `v1` is rejected.
    pub summarize: Option<String>,
    pub topics: Option<String>,
    pub sentiment: Option<String>,
    pub intents: Option<String>,
}

impl AnalyzeQuery {
    /// Folds decoded query pairs. A repeated key keeps its last value and
    /// unknown keys are ignored.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "language" => &mut query.language,
                "summarize" => &mut query.summarize,
                "topics" => &mut query.topics,
                "sentiment" => &mut query.sentiment,
                "intents" => &mut query.intents,
                _ => continue,
            };
            *slot = Some(value);
        }
        query
    }
}

impl From<AnalyzeQuery> for AnalysisParams {
    fn from(query: AnalyzeQuery) -> Self {
        AnalysisParams {
            language: query.language,
            summarize: query.summarize,
            topics: query.topics,
            sentiment: query.sentiment,
            intents: query.intents,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyzeResponse {
    /// The provider's results, unchanged.
    #[schema(value_type = Object)]
    pub results: AnalysisResults,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Analyze text or the content behind a URL.
///
/// Requires a session token from `/api/session`. The same handler also serves
/// `/text-intelligence/analyze`.
#[utoipa::path(
    post,
    path = "/api/text-intelligence",
    request_body = AnalyzeBody,
    params(AnalyzeQuery),
    responses(
        (status = 200, description = "Analysis results", body = AnalyzeResponse),
        (status = 400, description = "Validation or recognized processing error"),
        (status = 401, description = "Missing, invalid or expired session token"),
        (status = 500, description = "Text processing failed")
    )
)]
pub async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
    body: Result<Json<AnalyzeBody>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, HttpError> {
    let Query(pairs) = query.map_err(|e| ValidationError::MalformedQuery(e.body_text()))?;
    let query = AnalyzeQuery::from_pairs(pairs);
    let Json(body) = body.map_err(|e| ValidationError::MalformedBody(e.body_text()))?;

    // 1. Validate input, then options
    let request = validate(&body.into())?;
    let options = build_options(&query.into())?;

    // 2. Forward to the provider
    let results = state.analyzer.analyze(&request, &options).await?;
    info!(features = ?options, "Text analysis completed");

    Ok(Json(AnalyzeResponse { results }))
}

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "text-intelligence",
    })
}

/// Returns the `[meta]` section of the project's metadata file.
#[utoipa::path(
    get,
    path = "/api/metadata",
    responses(
        (status = 200, description = "Metadata table"),
        (status = 500, description = "Metadata file or section missing")
    )
)]
pub async fn metadata_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, HttpError> {
    let meta = load_meta(&state.config.metadata_path).await?;
    Ok(Json(meta))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn repeated_query_key_keeps_last_value() {
        let query = AnalyzeQuery::from_pairs(pairs(&[
            ("summarize", "v2"),
            ("topics", "false"),
            ("summarize", "true"),
            ("topics", "true"),
        ]));
        assert_eq!(query.summarize.as_deref(), Some("true"));
        assert_eq!(query.topics.as_deref(), Some("true"));
    }

    #[test]
    fn unknown_query_keys_are_ignored() {
        let query = AnalyzeQuery::from_pairs(pairs(&[("model", "nova"), ("language", "de")]));
        assert_eq!(
            query,
            AnalyzeQuery {
                language: Some("de".to_string()),
                ..Default::default()
            }
        );
    }
}
