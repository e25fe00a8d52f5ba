//! Provider response shapes for `generateContent` and each streamed chunk.
//!
//! Parts are kept as raw JSON so unknown part kinds (function calls, thoughts, ...) do not
//! fail the whole chunk; they are converted leniently by [`GenerateContentResponse::parts`].

use gateway_types::ContentPart;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
    /// Flattened text some relays send instead of candidates.
    #[serde(default, rename = "text", skip_serializing_if = "Option::is_none")]
    pub plain_text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<CandidateContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_reason_message: Option<String>,
}

impl GenerateContentResponse {
    fn first_candidate_parts(&self) -> &[Value] {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.as_slice())
            .unwrap_or_default()
    }

    /// Recognized content parts of the first candidate. Unknown part kinds are dropped.
    pub fn parts(&self) -> Vec<ContentPart> {
        self.first_candidate_parts().iter().cloned().filter_map(ContentPart::from_value).collect()
    }

    /// Number of raw parts that did not map to a known part kind.
    pub fn unrecognized_part_count(&self) -> usize {
        self.first_candidate_parts()
            .iter()
            .filter(|p| ContentPart::from_value((*p).clone()).is_none())
            .count()
    }

    /// Plain-text view of a chunk: concatenated `text` fields of the first candidate,
    /// else the flattened top-level `text`.
    pub fn text(&self) -> Option<String> {
        let text: String = self
            .first_candidate_parts()
            .iter()
            .filter_map(|p| p.get("text").and_then(Value::as_str))
            .collect();
        if !text.is_empty() {
            return Some(text);
        }
        self.plain_text.clone().filter(|t| !t.is_empty())
    }

    pub fn finish_reason(&self) -> Option<&str> {
        self.candidates.first().and_then(|c| c.finish_reason.as_deref())
    }

    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback.as_ref().and_then(|f| f.block_reason.as_deref())
    }
}
