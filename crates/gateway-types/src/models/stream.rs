//! Uniform streaming unit produced by the provider stream adapter.

use serde::{Deserialize, Serialize};

use super::content::ContentPart;

/// Ordered content parts of one provider chunk plus an optional terminal marker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct StreamChunk {
    pub parts: Vec<ContentPart>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

impl StreamChunk {
    pub fn new(parts: Vec<ContentPart>) -> Self {
        Self { parts, finish_reason: None }
    }

    pub fn finished(reason: impl Into<String>) -> Self {
        Self { parts: Vec::new(), finish_reason: Some(reason.into()) }
    }

    pub fn has_parts(&self) -> bool {
        !self.parts.is_empty()
    }

    /// Concatenated text of all text parts. Binary parts contribute nothing.
    pub fn text(&self) -> String {
        self.parts.iter().filter_map(ContentPart::as_text).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_skips_binary_parts() {
        let chunk = StreamChunk::new(vec![
            ContentPart::text("Hel"),
            ContentPart::inline("image/png", "AAAA"),
            ContentPart::text("lo"),
        ]);
        assert_eq!(chunk.text(), "Hello");
    }

    #[test]
    fn test_finished_chunk_has_no_parts() {
        let chunk = StreamChunk::finished("STOP");
        assert!(!chunk.has_parts());
        assert_eq!(chunk.text(), "");
    }
}
