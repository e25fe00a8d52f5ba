//! Small string helpers shared by the pipeline.

/// Truncate to at most `max_chars` characters, never splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Log-safe form of a credential: first 6 characters and an ellipsis.
pub fn mask_credential(credential: &str) -> String {
    if credential.is_empty() {
        return "<none>".to_string();
    }
    format!("{}...", truncate_chars(credential, 6))
}

/// Remove every occurrence of the caller's credential from a client-facing message.
pub fn redact_credential(message: &str, credential: &str) -> String {
    if credential.is_empty() {
        return message.to_string();
    }
    message.replace(credential, "***")
}
