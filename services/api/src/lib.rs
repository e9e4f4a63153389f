//! services/api/src/lib.rs
//!
//! HTTP gateway in front of Deepgram's Text Intelligence API, with
//! nonce-gated session tokens.

pub mod adapters;
pub mod config;
pub mod error;
pub mod metadata;
pub mod web;
