//! Message content model (Gemini `Content` / `Part` wire shape).

use serde::{Deserialize, Serialize};

/// Content role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Model,
}

/// Inline-encoded binary payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InlineBlob {
    #[serde(alias = "mime_type")]
    pub mime_type: String,
    /// Base64 encoded bytes
    pub data: String,
}

/// Reference to a file held by the provider's file store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileRef {
    #[serde(alias = "mime_type")]
    pub mime_type: String,
    #[serde(alias = "file_uri")]
    pub file_uri: String,
}

/// One unit of message content. Exactly one variant is populated.
///
/// Serializes to the provider wire shape:
/// `{"text": ..}`, `{"inlineData": {"mimeType", "data"}}` or `{"fileData": {"mimeType", "fileUri"}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ContentPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData", alias = "inline_data")]
        inline_data: InlineBlob,
    },
    FileData {
        #[serde(rename = "fileData", alias = "file_data")]
        file_data: FileRef,
    },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn inline(mime_type: impl Into<String>, base64_data: impl Into<String>) -> Self {
        Self::InlineData {
            inline_data: InlineBlob { mime_type: mime_type.into(), data: base64_data.into() },
        }
    }

    pub fn file(mime_type: impl Into<String>, file_uri: impl Into<String>) -> Self {
        Self::FileData {
            file_data: FileRef { mime_type: mime_type.into(), file_uri: file_uri.into() },
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            Self::InlineData { .. } | Self::FileData { .. } => None,
        }
    }

    pub fn is_file_ref(&self) -> bool {
        matches!(self, Self::FileData { .. })
    }

    /// Lenient conversion from an arbitrary provider/client part.
    /// Returns `None` for part kinds the gateway does not model (function calls, etc).
    pub fn from_value(value: serde_json::Value) -> Option<Self> {
        serde_json::from_value(value).ok()
    }
}

/// Ordered parts tagged with a role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    #[serde(default)]
    pub parts: Vec<ContentPart>,
}

impl Message {
    pub fn user(parts: Vec<ContentPart>) -> Self {
        Self { role: Role::User, parts }
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}
