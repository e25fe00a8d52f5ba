//! Upstream error sanitization: client-facing messages carry the HTTP status, a coarse
//! category and the provider's stated reason, never the raw upstream body.

use serde_json::Value;

use super::text::truncate_chars;

const MAX_REASON_CHARS: usize = 300;

/// Sanitize an upstream error for client consumption.
///
/// Returns `"<category> (HTTP <code>)"`, followed by the provider's `error.message`
/// when the body is a Google-style error object.
pub fn sanitize_upstream_error(status_code: u16, raw_text: &str) -> String {
    let category = classify_error(status_code, raw_text);
    let head = match category {
        ErrorCategory::RateLimited => format!("Rate limited (HTTP {})", status_code),
        ErrorCategory::QuotaExhausted => format!("Quota exhausted (HTTP {})", status_code),
        ErrorCategory::Unauthorized => format!("Authentication failed (HTTP {})", status_code),
        ErrorCategory::ModelNotFound => format!("Model not available (HTTP {})", status_code),
        ErrorCategory::InvalidArgument => format!("Invalid request (HTTP {})", status_code),
        ErrorCategory::ServerError => format!("Upstream server error (HTTP {})", status_code),
        ErrorCategory::Unknown => format!("Upstream error (HTTP {})", status_code),
    };

    match extract_provider_message(raw_text) {
        Some(reason) => format!("{}: {}", head, reason),
        None => head,
    }
}

/// Pull `error.message` out of a Google API error body.
pub fn extract_provider_message(raw_text: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(raw_text).ok()?;
    let message = parsed.get("error")?.get("message")?.as_str()?.trim();
    if message.is_empty() {
        return None;
    }
    Some(truncate_chars(message, MAX_REASON_CHARS))
}

enum ErrorCategory {
    RateLimited,
    QuotaExhausted,
    Unauthorized,
    ModelNotFound,
    InvalidArgument,
    ServerError,
    Unknown,
}

fn classify_error(status_code: u16, raw_text: &str) -> ErrorCategory {
    match status_code {
        429 => {
            if raw_text.contains("QUOTA_EXHAUSTED") || raw_text.contains("quota") {
                ErrorCategory::QuotaExhausted
            } else {
                ErrorCategory::RateLimited
            }
        },
        401 | 403 => ErrorCategory::Unauthorized,
        404 => ErrorCategory::ModelNotFound,
        400 => {
            if raw_text.contains("API_KEY_INVALID") || raw_text.contains("API key not valid") {
                ErrorCategory::Unauthorized
            } else {
                ErrorCategory::InvalidArgument
            }
        },
        500 | 502 | 503 | 504 => ErrorCategory::ServerError,
        _ => ErrorCategory::Unknown,
    }
}
