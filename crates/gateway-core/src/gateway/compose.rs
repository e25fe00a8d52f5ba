//! Provider request body construction.

use gateway_types::{GatewayConfig, GatewayError, Message};
use serde::{Deserialize, Serialize};
use tracing::debug;

const IMAGE_RESPONSE_MODALITIES: [&str; 2] = ["TEXT", "IMAGE"];

/// Body of a `generateContent` / `streamGenerateContent` call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub response_modalities: Vec<String>,
}

/// Build the provider call body for `model`.
///
/// Image generation models only see the current (last) message and are asked for both
/// text and image output. Every other model receives `messages` unchanged.
pub fn compose(
    config: &GatewayConfig,
    model: &str,
    mut messages: Vec<Message>,
) -> Result<GenerateRequest, GatewayError> {
    if config.is_image_generation_model(model) {
        let current = messages
            .pop()
            .filter(|m| !m.is_empty())
            .ok_or_else(|| GatewayError::invalid_request("No user content for image generation"))?;

        debug!("[Compose] {} is an image model, sending current message only", model);
        return Ok(GenerateRequest {
            contents: vec![current],
            generation_config: Some(GenerationConfig {
                response_modalities: IMAGE_RESPONSE_MODALITIES.iter().map(|m| m.to_string()).collect(),
            }),
        });
    }

    if messages.iter().all(Message::is_empty) {
        return Err(GatewayError::invalid_request("Resolved content is empty"));
    }

    Ok(GenerateRequest { contents: messages, generation_config: None })
}
