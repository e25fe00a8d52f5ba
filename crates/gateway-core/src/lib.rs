//! # Gateway Core
//!
//! Request pipeline of the Gemini chat gateway.
//!
//! ## Architecture
//!
//! ```text
//! gateway-core/src/
//! ├── gateway/
//! │   ├── handlers/     # /chat (multipart) and /v1beta/models/{model}:{action}
//! │   ├── ingest/       # text + URLs + attachments -> ordered content parts
//! │   ├── files/        # resumable upload and ACTIVE polling
//! │   ├── compose.rs    # provider request body
//! │   ├── provider.rs   # generation seam and chunk normalization
//! │   ├── reframe/      # NDJSON / OpenAI SSE framing
//! │   ├── upstream/     # reqwest client for the provider API
//! │   └── server.rs     # AppState and router
//! └── modules/          # config file, logging
//! ```

#![allow(clippy::map_err_ignore, reason = "Error context is provided in the replacement message")]
#![allow(clippy::needless_continue, reason = "Explicit continue improves loop readability")]
#![cfg_attr(
    test,
    allow(clippy::panic, clippy::print_stdout, clippy::assertions_on_result_states)
)]

pub mod gateway;
pub mod modules;

pub use gateway::{build_gateway_router, AppState};
