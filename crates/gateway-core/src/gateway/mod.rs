//! Chat gateway pipeline.
//!
//! ```text
//! inbound ─► handlers ─► ingest ─► files (upload/poll) ─► compose ─► provider ─► reframe ─► outbound
//! ```

pub mod common;
pub mod compose;
pub mod files;
pub mod handlers;
pub mod ingest;
pub mod middleware;
pub mod provider;
pub mod reframe;
pub mod server;
pub mod upstream;


pub use server::{build_gateway_router, AppState};
