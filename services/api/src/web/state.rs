//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use std::path::Path;
use std::sync::Arc;
use text_intelligence_core::{
    Clock, NonceStore, SessionIssuer, SessionSecret, TextAnalysisService,
};
use tracing::{info, warn};

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
///
/// The nonce store lives here rather than in a global, so it is dropped with
/// the state when the server shuts down.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub analyzer: Arc<dyn TextAnalysisService>,
    pub nonces: Arc<NonceStore>,
    pub sessions: Arc<SessionIssuer>,
    /// The prebuilt `index.html`, if one was found at startup.
    pub index_template: Option<Arc<str>>,
}

impl AppState {
    /// Wires up the nonce store and session issuer for `config`.
    pub fn new(
        config: Arc<Config>,
        analyzer: Arc<dyn TextAnalysisService>,
        clock: Arc<dyn Clock>,
        index_template: Option<String>,
    ) -> Self {
        let nonces = Arc::new(NonceStore::new(clock.clone()));
        let secret = SessionSecret::from_optional(config.session_secret.clone());
        let sessions = Arc::new(SessionIssuer::new(secret, nonces.clone(), clock));

        Self {
            config,
            analyzer,
            nonces,
            sessions,
            index_template: index_template.map(Arc::from),
        }
    }
}

/// Reads `index.html` from the frontend build directory.
///
/// A missing file is expected in development and only logged.
pub fn load_index_template(frontend_dist: &Path) -> Option<String> {
    let path = frontend_dist.join("index.html");
    match std::fs::read_to_string(&path) {
        Ok(html) => {
            info!("Loaded frontend template from {}", path.display());
            Some(html)
        }
        Err(e) => {
            warn!("No frontend template at {} ({}); GET / will return 404", path.display(), e);
            None
        }
    }
}
