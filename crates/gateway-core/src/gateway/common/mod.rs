pub mod random_id;
pub mod sanitize_error;
pub mod text;

pub use random_id::generate_random_id;
pub use sanitize_error::{extract_provider_message, sanitize_upstream_error};
pub use text::{mask_credential, redact_credential, truncate_chars};
