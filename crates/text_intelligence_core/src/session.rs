//! crates/text_intelligence_core/src/session.rs
//!
//! Issues and verifies the short-lived session tokens that guard the analysis
//! endpoint.
//!
//! Tokens are HS256 JWTs carrying only `iat` and `exp`. Nothing is stored
//! server-side after issuance: a token is valid while its signature checks out
//! and its expiry lies in the future.
//!
//! When the signing secret was configured explicitly, a token is only handed
//! out in exchange for a page nonce from the [`NonceStore`]. A secret generated
//! at startup means a development setup, and tokens are issued freely.

use crate::clock::Clock;
use crate::nonce::NonceStore;
use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Lifetime of an issued session token.
pub const SESSION_TTL_SECS: i64 = 3600;

const GENERATED_SECRET_BYTES: usize = 32;

//=========================================================================================
// Errors
//=========================================================================================

/// Reasons a session could not be issued or a token was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Authorization header with Bearer token is required")]
    MissingToken,
    #[error("Invalid session token")]
    InvalidToken,
    #[error("Session expired, please refresh the page")]
    SessionExpired,
    #[error("Valid session nonce required. Please refresh the page.")]
    InvalidNonce,
    #[error("Failed to sign session token: {0}")]
    Signing(String),
}

impl AuthError {
    /// The machine-readable code reported to clients.
    ///
    /// Expired and forged tokens share a code; only the message differs.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "MISSING_TOKEN",
            AuthError::InvalidToken | AuthError::SessionExpired => "INVALID_TOKEN",
            AuthError::InvalidNonce => "INVALID_NONCE",
            AuthError::Signing(_) => "INTERNAL_ERROR",
        }
    }
}

//=========================================================================================
// Secret and Token Types
//=========================================================================================

/// The HMAC key used to sign session tokens.
#[derive(Clone)]
pub enum SessionSecret {
    /// Supplied by the operator. Turns on nonce enforcement.
    Configured(Vec<u8>),
    /// Created at startup because none was supplied.
    Generated(Vec<u8>),
}

impl SessionSecret {
    /// Uses `configured` when present and non-empty, otherwise generates one.
    pub fn from_optional(configured: Option<String>) -> Self {
        match configured.filter(|s| !s.is_empty()) {
            Some(secret) => SessionSecret::Configured(secret.into_bytes()),
            None => Self::generate(),
        }
    }

    pub fn generate() -> Self {
        let mut bytes = [0u8; GENERATED_SECRET_BYTES];
        OsRng.fill_bytes(&mut bytes);
        SessionSecret::Generated(hex::encode(bytes).into_bytes())
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, SessionSecret::Configured(_))
    }

    fn as_bytes(&self) -> &[u8] {
        match self {
            SessionSecret::Configured(bytes) | SessionSecret::Generated(bytes) => bytes,
        }
    }
}

impl std::fmt::Debug for SessionSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = if self.is_configured() { "Configured" } else { "Generated" };
        write!(f, "SessionSecret::{}(<redacted>)", kind)
    }
}

/// Claims carried by a session token (unix seconds).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub iat: i64,
    pub exp: i64,
}

/// A signed, encoded session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

//=========================================================================================
// SessionIssuer
//=========================================================================================

/// Exchanges page nonces for session tokens and checks presented tokens.
pub struct SessionIssuer {
    secret: SessionSecret,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    nonces: Arc<NonceStore>,
    clock: Arc<dyn Clock>,
}

impl SessionIssuer {
    pub fn new(secret: SessionSecret, nonces: Arc<NonceStore>, clock: Arc<dyn Clock>) -> Self {
        let encoding_key = EncodingKey::from_secret(secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());
        Self {
            secret,
            encoding_key,
            decoding_key,
            nonces,
            clock,
        }
    }

    /// Whether `issue` demands a valid page nonce.
    pub fn requires_nonce(&self) -> bool {
        self.secret.is_configured()
    }

    /// The nonce store this issuer consumes from.
    pub fn nonces(&self) -> &Arc<NonceStore> {
        &self.nonces
    }

    /// Issues a new session token.
    ///
    /// With nonce enforcement on, `presented_nonce` must be a live nonce; it is
    /// consumed whether or not the rest of issuance succeeds.
    pub fn issue(&self, presented_nonce: Option<&str>) -> Result<SessionToken, AuthError> {
        if self.requires_nonce() {
            let accepted = presented_nonce
                .filter(|n| !n.is_empty())
                .is_some_and(|n| self.nonces.consume(n));
            if !accepted {
                debug!("Rejected session request with missing or stale nonce");
                return Err(AuthError::InvalidNonce);
            }
        }

        let now = self.clock.now();
        let claims = SessionClaims {
            iat: now.timestamp(),
            exp: (now + Duration::seconds(SESSION_TTL_SECS)).timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))?;

        debug!(exp = claims.exp, "Issued session token");
        Ok(SessionToken(token))
    }

    /// Checks a bearer token taken from the `Authorization` header.
    pub fn verify(&self, token: Option<&str>) -> Result<SessionClaims, AuthError> {
        let token = token.ok_or(AuthError::MissingToken)?;

        // Expiry is checked against our own clock below, with no leeway.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        let claims = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                debug!("Session token rejected: {}", e);
                AuthError::InvalidToken
            })?
            .claims;

        if claims.exp <= self.clock.now().timestamp() {
            return Err(AuthError::SessionExpired);
        }
        Ok(claims)
    }
}

impl std::fmt::Debug for SessionIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionIssuer")
            .field("secret", &self.secret)
            .field("nonces", &self.nonces)
            .finish_non_exhaustive()
    }
}
