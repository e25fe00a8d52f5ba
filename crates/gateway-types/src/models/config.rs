//! Gateway configuration model.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Inline-encoding threshold: attachments at or above this size go through the file store.
pub const DEFAULT_INLINE_LIMIT_BYTES: u64 = 5 * 1024 * 1024;
pub const DEFAULT_POLL_MAX_ATTEMPTS: u32 = 10;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_IMAGE_GENERATION_MODEL: &str = "gemini-2.0-flash-preview-image-generation";

/// Full gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
#[serde(default)]
pub struct GatewayConfig {
    /// Bind address used when LAN access is disabled
    #[validate(length(min = 1_u64))]
    pub host: String,
    /// Allow LAN access (bind to 0.0.0.0)
    pub allow_lan_access: bool,
    /// Port to listen on
    #[validate(range(min = 1_u16))]
    pub port: u16,
    /// Provider root URL (no trailing slash)
    #[validate(url)]
    pub upstream_base_url: String,
    /// Provider API version path segment
    #[validate(length(min = 1_u64))]
    pub api_version: String,
    #[validate(range(min = 1_u64))]
    pub inline_limit_bytes: u64,
    #[validate(range(min = 1_u32, max = 100_u32))]
    pub poll_max_attempts: u32,
    pub poll_interval_secs: u64,
    /// Upstream request timeout in seconds
    #[validate(range(min = 5_u64, max = 3600_u64))]
    pub request_timeout_secs: u64,
    #[validate(range(min = 1024_u64))]
    pub body_limit_bytes: u64,
    /// Models that receive TEXT+IMAGE response modalities and no carried context
    pub image_generation_models: Vec<String>,
    /// Root for non-API paths
    pub static_dir: String,
    /// Rolling log file directory; stdout only when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            allow_lan_access: false,
            port: 8000,
            upstream_base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_version: "v1beta".to_string(),
            inline_limit_bytes: DEFAULT_INLINE_LIMIT_BYTES,
            poll_max_attempts: DEFAULT_POLL_MAX_ATTEMPTS,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            request_timeout_secs: 300,
            body_limit_bytes: 100 * 1024 * 1024,
            image_generation_models: vec![DEFAULT_IMAGE_GENERATION_MODEL.to_string()],
            static_dir: ".".to_string(),
            log_dir: None,
        }
    }
}

impl GatewayConfig {
    pub fn get_bind_address(&self) -> &str {
        if self.allow_lan_access {
            "0.0.0.0"
        } else {
            &self.host
        }
    }

    pub fn is_image_generation_model(&self, model: &str) -> bool {
        self.image_generation_models.iter().any(|m| m == model)
    }

    /// Field validation flattened into one readable message.
    pub fn check(&self) -> Result<(), String> {
        self.validate().map_err(|e| format!("Invalid configuration: {}", e))
    }
}
