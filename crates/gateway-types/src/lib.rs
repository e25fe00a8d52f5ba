//! # Gateway Types
//!
//! Core types, content model, and error definitions for Gemini Gateway.
//!
//! - **`error`** - Typed error taxonomy for validation, attachments, provider and stream failures
//! - **`models`** - Content parts, messages, remote file handles, stream chunks, configuration
//!
//! ## Architecture Role
//!
//! `gateway-types` sits at the bottom of the dependency graph:
//!
//! ```text
//!         gateway-types (this crate)
//!                 │
//!                 ▼
//!           gateway-core
//!                 │
//!                 ▼
//!          gateway-server
//! ```

pub mod error;
pub mod models;

pub use error::{AttachmentError, GatewayError, Result};

pub use models::{
    ContentPart, FileRef, FileState, GatewayConfig, InlineBlob, Message, RemoteFileHandle, Role,
    StreamChunk,
};
