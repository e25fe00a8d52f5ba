// CORS middleware
use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};

/// create CORS layer
///
/// Browser chat clients are served from arbitrary origins and attach their own credential,
/// so any origin is accepted.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::HEAD, Method::OPTIONS])
        .allow_headers(Any)
        .expose_headers([axum::http::HeaderName::from_static("x-chat-id")])
        .max_age(std::time::Duration::from_secs(3600))
}
