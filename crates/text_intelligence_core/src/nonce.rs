//! crates/text_intelligence_core/src/nonce.rs
//!
//! Single-use page nonces. A nonce is handed out with every rendered page and
//! can be exchanged for a session token exactly once before it expires.

use crate::clock::Clock;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use rand::{rngs::OsRng, RngCore};
use std::collections::HashMap;
use std::sync::Arc;

/// How long an issued nonce stays consumable.
pub const NONCE_TTL_SECS: i64 = 5 * 60;

const NONCE_BYTES: usize = 16;

/// An issued nonce value (hex-encoded random bytes).
pub type NonceId = String;

/// In-memory nonce registry shared by all request handlers.
///
/// Every operation takes the same lock, so two requests racing to consume one
/// nonce cannot both succeed.
pub struct NonceStore {
    entries: Mutex<HashMap<NonceId, DateTime<Utc>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl NonceStore {
    /// Creates an empty store with the default five minute TTL.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_ttl(clock, Duration::seconds(NONCE_TTL_SECS))
    }

    pub fn with_ttl(clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    /// Generates a fresh nonce and records its expiry.
    pub fn issue(&self) -> NonceId {
        let mut bytes = [0u8; NONCE_BYTES];
        OsRng.fill_bytes(&mut bytes);
        let nonce = hex::encode(bytes);

        let expires_at = self.clock.now() + self.ttl;
        self.entries.lock().insert(nonce.clone(), expires_at);
        nonce
    }

    /// Removes `nonce` and reports whether it was still valid.
    ///
    /// Unknown, already consumed and expired nonces all return `false`.
    pub fn consume(&self, nonce: &str) -> bool {
        let expires_at = self.entries.lock().remove(nonce);
        match expires_at {
            Some(expires_at) => self.clock.now() < expires_at,
            None => false,
        }
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, expires_at| *expires_at > now);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl std::fmt::Debug for NonceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NonceStore")
            .field("ttl", &self.ttl)
            .field("outstanding", &self.len())
            .finish_non_exhaustive()
    }
}
