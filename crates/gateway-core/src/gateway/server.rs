use axum::{
    extract::DefaultBodyLimit,
    http::{StatusCode, Uri},
    routing::post,
    Router,
};
use gateway_types::{GatewayConfig, GatewayError};
use std::sync::Arc;

use crate::gateway::files::{FileStore, Sleeper, TokioSleeper};
use crate::gateway::handlers;
use crate::gateway::ingest::MediaFetcher;
use crate::gateway::provider::GenerativeProvider;
use crate::gateway::upstream::{HttpMediaFetcher, UpstreamClient};

/// Axum application state. Shared read-only across requests.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub provider: Arc<dyn GenerativeProvider>,
    pub files: Arc<dyn FileStore>,
    pub fetcher: Arc<dyn MediaFetcher>,
    pub sleeper: Arc<dyn Sleeper>,
}

impl AppState {
    /// Production wiring: one upstream client serves generation and the file store,
    /// and its connection pool is shared with the media fetcher.
    pub fn from_config(config: GatewayConfig) -> Result<Self, GatewayError> {
        let upstream = Arc::new(UpstreamClient::from_config(&config)?);
        let fetcher = Arc::new(HttpMediaFetcher::new(upstream.http_client().clone()));

        Ok(Self {
            config: Arc::new(config),
            provider: upstream.clone(),
            files: upstream,
            fetcher,
            sleeper: Arc::new(TokioSleeper),
        })
    }
}

async fn not_routable(uri: Uri) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("Not found: {}", uri.path()))
}

/// Gateway API routes. Static assets and health checks are mounted by the binary.
pub fn build_gateway_router(state: AppState) -> Router<()> {
    let body_limit = usize::try_from(state.config.body_limit_bytes).unwrap_or(usize::MAX);

    Router::new()
        // Native protocol
        .route("/chat", post(handlers::native::handle_chat).fallback(not_routable))
        // Gemini protocol
        .route(
            "/v1beta/models/:model_action",
            post(handlers::gemini::handle_generate).fallback(not_routable),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
