//! services/api/src/adapters/deepgram.rs
//!
//! This module contains the adapter for Deepgram's Text Intelligence (`/v1/read`)
//! service. It implements the `TextAnalysisService` port from the `core` crate.

use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use text_intelligence_core::{
    domain::{AnalysisOptions, AnalysisRequest, AnalysisResults},
    ports::{AnalysisError, AnalysisResult, TextAnalysisService},
};
use tracing::debug;

const READ_PATH: &str = "/v1/read";

// Deepgram error codes that indicate an oversized payload.
const TOO_LONG_CODES: &[&str] = &["PAYLOAD_TOO_LARGE", "TEXT_TOO_LONG"];

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `TextAnalysisService` on top of the Deepgram REST API.
#[derive(Clone)]
pub struct DeepgramAdapter {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl DeepgramAdapter {
    /// Creates a new `DeepgramAdapter`.
    ///
    /// `base_url` is the API origin without a path (e.g. `https://api.deepgram.com`).
    /// Every request is bounded by `timeout`.
    pub fn new(api_key: String, base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), READ_PATH),
        })
    }
}

//=========================================================================================
// Wire Types
//=========================================================================================

#[derive(Debug, Deserialize)]
struct ReadResponse {
    #[serde(default)]
    results: AnalysisResults,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    err_code: Option<String>,
    err_msg: Option<String>,
}

//=========================================================================================
// `TextAnalysisService` Trait Implementation
//=========================================================================================

#[async_trait]
impl TextAnalysisService for DeepgramAdapter {
    async fn analyze(
        &self,
        request: &AnalysisRequest,
        options: &AnalysisOptions,
    ) -> AnalysisResult<AnalysisResults> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(AUTHORIZATION, format!("Token {}", self.api_key))
            .query(options)
            .json(request)
            .send()
            .await
            .map_err(|e| AnalysisError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(%status, body = %body, "Deepgram returned an error");
            return Err(classify_failure(status, &body, request));
        }

        let parsed: ReadResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::Transport(e.to_string()))?;
        Ok(parsed.results)
    }
}

/// Maps a failed Deepgram response onto the port's error variants.
///
/// Only the status code, the structured `err_code`, and the kind of input that
/// was sent are consulted.
fn classify_failure(status: StatusCode, body: &str, request: &AnalysisRequest) -> AnalysisError {
    let error: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = error
        .err_msg
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());

    let too_long = status == StatusCode::PAYLOAD_TOO_LARGE
        || error
            .err_code
            .as_deref()
            .is_some_and(|code| TOO_LONG_CODES.contains(&code));
    if too_long {
        return AnalysisError::TextTooLong(message);
    }

    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => match request {
            AnalysisRequest::Text(_) => AnalysisError::InvalidText(message),
            AnalysisRequest::Url(_) => AnalysisError::InvalidUrl(message),
        },
        _ => AnalysisError::Upstream(format!("{}: {}", status, message)),
    }
}
