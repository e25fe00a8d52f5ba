//! Attachment pipeline errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors for a single attachment. The ingestor turns each of these into a
/// descriptive text part instead of failing the message.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum AttachmentError {
    /// Embedded media URL could not be downloaded
    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    /// Network failure or provider rejection while uploading
    #[error("Upload failed: {message}")]
    Upload { message: String },

    /// Transient failure reading the file state during polling
    #[error("Failed to read state of {name}: {message}")]
    FileLookup { name: String, message: String },

    /// Provider reported FAILED for the uploaded file
    #[error("File {name} processing failed: {reason}")]
    FileProcessing { name: String, reason: String },

    /// Attempt budget exhausted without reaching a terminal state
    #[error("File {name} did not become ACTIVE after {attempts} attempts")]
    FileTimeout { name: String, attempts: u32 },
}

impl AttachmentError {
    pub fn upload(message: impl Into<String>) -> Self {
        Self::Upload { message: message.into() }
    }
}
