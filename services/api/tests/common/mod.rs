//! Shared fixtures for the router-level tests.

#![allow(dead_code)]

use api_lib::{
    config::Config,
    web::{build_router, AppState},
};
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, Response},
    Router,
};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use text_intelligence_core::{
    AnalysisError, AnalysisOptions, AnalysisRequest, AnalysisResult, AnalysisResults, Clock,
    MockClock, TextAnalysisService,
};
use tower::ServiceExt as _;

pub const INDEX_HTML: &str =
    "<!doctype html><html><head><title>Text Intelligence</title></head><body></body></html>";

/// A provider stand-in that records calls and replies with a canned outcome.
pub struct StubAnalyzer {
    outcome: Mutex<AnalysisResult<AnalysisResults>>,
    pub calls: Mutex<Vec<(AnalysisRequest, AnalysisOptions)>>,
}

impl StubAnalyzer {
    pub fn returning(results: Value) -> Arc<Self> {
        let results = results.as_object().cloned().unwrap_or_default();
        Arc::new(Self {
            outcome: Mutex::new(Ok(results)),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(error: AnalysisError) -> Arc<Self> {
        Arc::new(Self {
            outcome: Mutex::new(Err(error)),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl TextAnalysisService for StubAnalyzer {
    async fn analyze(
        &self,
        request: &AnalysisRequest,
        options: &AnalysisOptions,
    ) -> AnalysisResult<AnalysisResults> {
        self.calls
            .lock()
            .unwrap()
            .push((request.clone(), options.clone()));
        self.outcome.lock().unwrap().clone()
    }
}

/// Everything a test needs to drive the router and inspect shared state.
pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub clock: MockClock,
    pub analyzer: Arc<StubAnalyzer>,
}

pub struct TestAppBuilder {
    session_secret: Option<String>,
    index_template: Option<String>,
    metadata_path: PathBuf,
    analyzer: Arc<StubAnalyzer>,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            session_secret: None,
            index_template: Some(INDEX_HTML.to_string()),
            metadata_path: PathBuf::from("/nonexistent/deepgram.toml"),
            analyzer: StubAnalyzer::returning(json!({"summary": {"text": "A short summary."}})),
        }
    }

    pub fn session_secret(mut self, secret: &str) -> Self {
        self.session_secret = Some(secret.to_string());
        self
    }

    pub fn without_frontend(mut self) -> Self {
        self.index_template = None;
        self
    }

    pub fn metadata_path(mut self, path: PathBuf) -> Self {
        self.metadata_path = path;
        self
    }

    pub fn analyzer(mut self, analyzer: Arc<StubAnalyzer>) -> Self {
        self.analyzer = analyzer;
        self
    }

    pub fn build(self) -> TestApp {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            log_level: tracing::Level::DEBUG,
            deepgram_api_key: "test-key".to_string(),
            deepgram_api_url: "http://127.0.0.1:1".to_string(),
            deepgram_timeout: Duration::from_secs(1),
            session_secret: self.session_secret,
            frontend_dist: PathBuf::from("/nonexistent"),
            metadata_path: self.metadata_path,
        };

        let clock = MockClock::new();
        let shared_clock: Arc<dyn Clock> = Arc::new(clock.clone());
        let state = Arc::new(AppState::new(
            Arc::new(config),
            self.analyzer.clone(),
            shared_clock,
            self.index_template,
        ));

        TestApp {
            router: build_router(state.clone()),
            state,
            clock,
            analyzer: self.analyzer,
        }
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Issues a session token directly, bypassing the nonce check.
    pub fn token(&self) -> String {
        let nonce = self.state.nonces.issue();
        self.state
            .sessions
            .issue(Some(&nonce))
            .unwrap()
            .into_string()
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn analyze_request(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

/// Pulls the nonce out of the `session-nonce` meta tag.
pub fn extract_nonce(html: &str) -> Option<String> {
    let marker = "<meta name=\"session-nonce\" content=\"";
    let start = html.find(marker)? + marker.len();
    let end = html[start..].find('"')? + start;
    Some(html[start..end].to_string())
}
