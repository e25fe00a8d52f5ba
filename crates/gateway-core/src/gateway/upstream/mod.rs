//! Provider HTTP layer: the reqwest client, response shapes and the SSE decoder.

pub mod client;
pub mod media_fetcher;
pub mod response;
pub mod sse;

pub use client::UpstreamClient;
pub use media_fetcher::HttpMediaFetcher;
pub use response::{Candidate, GenerateContentResponse, PromptFeedback};
