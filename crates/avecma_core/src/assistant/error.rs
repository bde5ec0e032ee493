//! Typed failures of the generative-language API.
//!
//! # Responsibility
//! - Classify API failures once, from the HTTP status and structured body.
//!
//! # Invariants
//! - Transport failures (timeouts, DNS, TLS) are always `Unknown`.
//! - `detail` carries API/transport diagnostics, never user content or keys.

use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Category of an assistant failure as seen by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssistantErrorKind {
    RateLimited,
    Unauthorized,
    Unknown,
}

impl AssistantErrorKind {
    /// HTTP status the relay answers with.
    pub fn http_status(self) -> u16 {
        match self {
            Self::RateLimited => 429,
            Self::Unauthorized => 401,
            Self::Unknown => 500,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::RateLimited => "rate_limited",
            Self::Unauthorized => "unauthorized",
            Self::Unknown => "unknown",
        }
    }

    /// Classifies an error response.
    ///
    /// `body` is the parsed JSON error document, when the API sent one:
    /// `{"error": {"code", "status", "message", "details": [{"reason"}]}}`.
    pub fn classify(http_status: Option<u16>, body: Option<&Value>) -> Self {
        let error = body.and_then(|value| value.get("error"));
        let code = error
            .and_then(|value| value.get("code"))
            .and_then(Value::as_u64);
        let status = error
            .and_then(|value| value.get("status"))
            .and_then(Value::as_str)
            .unwrap_or_default();
        let reasons: Vec<&str> = error
            .and_then(|value| value.get("details"))
            .and_then(Value::as_array)
            .map(|details| {
                details
                    .iter()
                    .filter_map(|detail| detail.get("reason").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default();

        if reasons.iter().any(|reason| reason.starts_with("API_KEY_"))
            || matches!(status, "UNAUTHENTICATED" | "PERMISSION_DENIED")
        {
            return Self::Unauthorized;
        }
        if status == "RESOURCE_EXHAUSTED" || reasons.contains(&"RATE_LIMIT_EXCEEDED") {
            return Self::RateLimited;
        }

        match code.or(http_status.map(u64::from)) {
            Some(429) => Self::RateLimited,
            Some(401) | Some(403) => Self::Unauthorized,
            _ => Self::Unknown,
        }
    }
}

/// Failure of one generative-language call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantError {
    pub kind: AssistantErrorKind,
    /// HTTP status of the upstream response, when one arrived.
    pub upstream_status: Option<u16>,
    pub detail: String,
}

impl AssistantError {
    pub fn new(
        kind: AssistantErrorKind,
        upstream_status: Option<u16>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            upstream_status,
            detail: detail.into(),
        }
    }

    /// Builds a classified error from a non-success response.
    pub fn from_response(http_status: u16, raw_body: &str) -> Self {
        let parsed = serde_json::from_str::<Value>(raw_body).ok();
        let kind = AssistantErrorKind::classify(Some(http_status), parsed.as_ref());
        let detail = parsed
            .as_ref()
            .and_then(|value| value.pointer("/error/message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("upstream responded with status {http_status}"));
        Self::new(kind, Some(http_status), detail)
    }

    /// Failure before or while talking to the API.
    pub fn transport(detail: impl Into<String>) -> Self {
        Self::new(AssistantErrorKind::Unknown, None, detail)
    }
}

impl Display for AssistantError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.upstream_status {
            Some(status) => write!(
                f,
                "assistant request failed ({}, status {status}): {}",
                self.kind.as_str(),
                self.detail
            ),
            None => write!(
                f,
                "assistant request failed ({}): {}",
                self.kind.as_str(),
                self.detail
            ),
        }
    }
}

impl Error for AssistantError {}

impl From<reqwest::Error> for AssistantError {
    fn from(value: reqwest::Error) -> Self {
        let status = value.status().map(|status| status.as_u16());
        let kind = AssistantErrorKind::classify(status, None);
        Self::new(kind, status, value.without_url().to_string())
    }
}
