//! Domain models.

pub mod config;
pub mod content;
pub mod file;
pub mod stream;

pub use config::GatewayConfig;
pub use content::{ContentPart, FileRef, InlineBlob, Message, Role};
pub use file::{FileState, FileStatus, RemoteFileHandle};
pub use stream::StreamChunk;
