//! Remote file lifecycle: upload to the provider file store, then poll until the asset
//! reaches a terminal state.
//!
//! ```text
//! upload() ──► UPLOADING ──► PROCESSING ──► ACTIVE
//!                  │              │
//!                  └──────────────┴───────► FAILED
//! ```
//!
//! The store and the sleep are injected so the poll/retry/timeout behaviour is testable
//! without network or wall-clock delays.

mod poller;
mod uploader;

#[cfg(test)]
pub(crate) mod testing;

pub use uploader::FileUploader;

use async_trait::async_trait;
use bytes::Bytes;
use gateway_types::{AttachmentError, GatewayConfig, RemoteFileHandle};
use std::time::Duration;

/// Provider file store operations.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Submit an asset. A successful call returns a handle in any state.
    async fn upload(
        &self,
        api_key: &str,
        data: Bytes,
        mime_type: &str,
        display_name: &str,
    ) -> Result<RemoteFileHandle, AttachmentError>;

    /// Fetch the current snapshot of a file by its resource name (`files/...`).
    async fn get(&self, api_key: &str, name: &str) -> Result<RemoteFileHandle, AttachmentError>;
}

/// Injectable delay used between polls.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real-time sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Attempt budget for `await_active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: gateway_types::models::config::DEFAULT_POLL_MAX_ATTEMPTS,
            interval: Duration::from_secs(gateway_types::models::config::DEFAULT_POLL_INTERVAL_SECS),
        }
    }
}

impl PollPolicy {
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self {
            max_attempts: config.poll_max_attempts.max(1),
            interval: Duration::from_secs(config.poll_interval_secs),
        }
    }
}
