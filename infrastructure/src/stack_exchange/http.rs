//! Shared HTTP response helpers for the Stack Exchange client.
//!
//! Centralizes status-code checks (429 throttling, non-success →
//! [`FetchError::Upstream`]) so the client stays focused on request
//! construction and response mapping.

use serde_json::Value;
use stackgate_application::{FetchError, THROTTLED_STATUS};

/// Longest upstream error body kept in an error message
const MAX_ERROR_BODY: usize = 512;

/// Check an HTTP response for error statuses.
///
/// Returns the response unchanged on success. Otherwise builds an
/// [`FetchError::Upstream`] carrying the status and the upstream error
/// message: `error_name: error_message` when the body is a Stack Exchange
/// error document, the raw (truncated) body otherwise.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, FetchError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = error_message(&body)
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| "unknown error".to_string());

    Err(FetchError::upstream(Some(status.as_u16()), message))
}

/// Map a transport-level failure (connect, timeout, decode)
pub fn transport_error(err: reqwest::Error) -> FetchError {
    let status = err.status().map(|s| s.as_u16());
    if status == Some(THROTTLED_STATUS) {
        return FetchError::throttled(err.to_string());
    }
    FetchError::upstream(status, err.to_string())
}

fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(doc) = serde_json::from_str::<Value>(trimmed) {
        let name = doc.get("error_name").and_then(Value::as_str);
        let message = doc.get("error_message").and_then(Value::as_str);
        match (name, message) {
            (Some(name), Some(message)) => return Some(format!("{}: {}", name, message)),
            (None, Some(message)) => return Some(message.to_string()),
            _ => {}
        }
    }

    Some(truncate(trimmed, MAX_ERROR_BODY).to_string())
}

fn truncate(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
