// src/error.rs
//! Error taxonomy for calls against the UCB service

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Longest raw-body excerpt carried into an error message.
const DETAIL_MAX_CHARS: usize = 200;

/// What can go wrong talking to the scoring service. Transport problems,
/// application-level error responses and undecodable payloads are kept
/// apart so callers can present each differently.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("cannot reach the UCB service: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("service error (status {status}): {detail}")]
    Service { status: StatusCode, detail: String },

    #[error("unexpected response shape: {0}")]
    DataShape(String),

    #[error("session expired")]
    SessionExpired,
}

/// Optional structured error body the backend attaches to failures.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

impl ApiError {
    /// Build a `Service` error from a non-2xx response. Prefers the JSON
    /// `detail` field, falls back to the raw body text, then to the bare
    /// status line.
    pub fn from_error_response(status: StatusCode, body: &str) -> Self {
        let detail = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|e| e.detail)
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| {
                let raw = body.trim();
                if raw.is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                } else {
                    raw.chars().take(DETAIL_MAX_CHARS).collect()
                }
            });

        ApiError::Service { status, detail }
    }

    /// True for application-level error responses (the service answered,
    /// but with a failure status).
    pub fn is_service_error(&self) -> bool {
        matches!(self, ApiError::Service { .. })
    }
}
