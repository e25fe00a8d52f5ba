// Handlers module - HTTP endpoint handlers
pub mod common;
pub mod gemini;
pub mod native;
