//! Failure taxonomy for webhook calls.
//!
//! Classification looks at structured signals only: the timeout wrapper, the
//! HTTP status code, and reqwest's error kind. Message text is never parsed.

use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed set of failure kinds shown to users.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Caller-side form errors. Never produced by the gateway itself.
    Validation,
    Authentication,
    Timeout,
    Network,
    Server,
    Unknown,
}

impl ErrorKind {
    /// Fixed text for toasts and form banners.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Validation => "Please check the highlighted fields and try again.",
            Self::Authentication => "Authentication failed. Please contact support.",
            Self::Timeout => "Request timed out. Please check your connection and try again.",
            Self::Network => "Network error. Please check your internet connection.",
            Self::Server => "Server error. Please try again later.",
            Self::Unknown => "Something went wrong. Please try again.",
        }
    }

    pub fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            401 | 403 => Self::Authentication,
            500..=599 => Self::Server,
            _ => Self::Unknown,
        }
    }
}

/// A classified gateway failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind:?} error: {detail}")]
pub struct GatewayError {
    pub kind: ErrorKind,
    /// Diagnostic detail for logs; not meant for end users.
    pub detail: String,
}

pub type Result<T> = std::result::Result<T, GatewayError>;

impl GatewayError {
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn timeout(after: Duration) -> Self {
        Self::new(
            ErrorKind::Timeout,
            format!("no response within {}ms", after.as_millis()),
        )
    }

    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let body = body.trim();
        let detail = if body.is_empty() {
            format!("HTTP {}", status)
        } else {
            format!("HTTP {}: {}", status, truncate(body, 200))
        };
        Self::new(ErrorKind::from_status(status), detail)
    }

    pub fn user_message(&self) -> &'static str {
        self.kind.user_message()
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Timeout | ErrorKind::Network | ErrorKind::Server
        )
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        let kind = if e.is_timeout() {
            ErrorKind::Timeout
        } else if let Some(status) = e.status() {
            ErrorKind::from_status(status)
        } else if e.is_connect() || e.is_request() {
            ErrorKind::Network
        } else {
            ErrorKind::Unknown
        };
        Self::new(kind, e.to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(ErrorKind::Unknown, format!("invalid response body: {}", e))
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
