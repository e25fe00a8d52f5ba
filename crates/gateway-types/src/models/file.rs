//! Remote file handle and its lifecycle state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Processing state of an uploaded file.
///
/// Lifecycle: `UPLOADING -> PROCESSING -> ACTIVE | FAILED`. Transitions only move forward;
/// `ACTIVE` and `FAILED` are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileState {
    #[default]
    #[serde(alias = "STATE_UNSPECIFIED")]
    Uploading,
    Processing,
    Active,
    Failed,
}

impl FileState {
    fn rank(self) -> u8 {
        match self {
            Self::Uploading => 0,
            Self::Processing => 1,
            Self::Active | Self::Failed => 2,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Active | Self::Failed)
    }

    /// Whether moving from `self` to `next` is a legal forward transition.
    pub fn can_advance_to(self, next: FileState) -> bool {
        if self.is_terminal() {
            return self == next;
        }
        next.rank() >= self.rank()
    }
}

impl fmt::Display for FileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uploading => write!(f, "UPLOADING"),
            Self::Processing => write!(f, "PROCESSING"),
            Self::Active => write!(f, "ACTIVE"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

/// Provider-reported failure detail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct FileStatus {
    #[serde(default)]
    pub message: String,
}

/// Provider-side reference to an uploaded asset.
///
/// Owned by the uploader for the duration of one request; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFileHandle {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub state: FileState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<FileStatus>,
}

impl RemoteFileHandle {
    pub fn is_active(&self) -> bool {
        self.state == FileState::Active
    }

    /// Merge a freshly fetched snapshot into this handle.
    ///
    /// Metadata is taken from the snapshot when present; the state only moves forward,
    /// a regressing snapshot keeps the current state.
    pub fn advance(self, latest: RemoteFileHandle) -> RemoteFileHandle {
        let state =
            if self.state.can_advance_to(latest.state) { latest.state } else { self.state };
        RemoteFileHandle {
            name: if latest.name.is_empty() { self.name } else { latest.name },
            uri: if latest.uri.is_empty() { self.uri } else { latest.uri },
            mime_type: if latest.mime_type.is_empty() { self.mime_type } else { latest.mime_type },
            state,
            error: latest.error.or(self.error),
        }
    }

    pub fn failure_reason(&self) -> String {
        self.error
            .as_ref()
            .map(|e| e.message.clone())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "unknown error".to_string())
    }
}
