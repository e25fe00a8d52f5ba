use axum::{
    handler::HandlerWithoutStateExt,
    http::{StatusCode, Uri},
    response::IntoResponse,
    routing::get,
    Router,
};
use gateway_core::gateway::middleware::cors_layer;
use gateway_core::{build_gateway_router, AppState};
use tower_http::{services::ServeDir, trace::TraceLayer};

pub fn build_router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();

    let health = Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
        .route("/version", get(version_info));

    let assets = ServeDir::new(&static_dir)
        .append_index_html_on_directories(true)
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(not_found.into_service());

    // API routes take precedence; anything unmatched is looked up under the static root.
    health
        .merge(build_gateway_router(state))
        .fallback_service(assets)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, axum::Json(serde_json::json!({"status": "ok"})))
}

async fn version_info() -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({
            "version": option_env!("GIT_VERSION").unwrap_or("dev"),
            "build_time": option_env!("BUILD_TIME").unwrap_or("unknown"),
            "cargo_version": env!("CARGO_PKG_VERSION"),
        })),
    )
}

async fn not_found(uri: Uri) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("Not found: {}", uri.path()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum_test::TestServer;
    use gateway_types::GatewayConfig;

    fn server_with_static(dir: &std::path::Path) -> TestServer {
        let config = GatewayConfig {
            static_dir: dir.to_string_lossy().into_owned(),
            ..GatewayConfig::default()
        };
        let state = AppState::from_config(config).unwrap();
        TestServer::new(build_router(state)).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let dir = tempfile::tempdir().unwrap();
        let server = server_with_static(dir.path());

        for path in ["/health", "/healthz"] {
            let response = server.get(path).await;
            response.assert_status_ok();
            response.assert_json(&serde_json::json!({"status": "ok"}));
        }
    }

    #[tokio::test]
    async fn test_version_reports_crate_version() {
        let dir = tempfile::tempdir().unwrap();
        let server = server_with_static(dir.path());

        let body: serde_json::Value = server.get("/version").await.json();
        assert_eq!(body["cargo_version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_serves_index_from_static_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>chat</h1>").unwrap();
        let server = server_with_static(dir.path());

        let response = server.get("/").await;
        response.assert_status_ok();
        assert!(response.text().contains("<h1>chat</h1>"));
    }

    #[tokio::test]
    async fn test_missing_asset_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let server = server_with_static(dir.path());

        let response = server.get("/nope.js").await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.text(), "Not found: /nope.js");
    }

    #[tokio::test]
    async fn test_chat_route_wins_over_static_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("chat"), "static").unwrap();
        let server = server_with_static(dir.path());

        let response = server.get("/chat").await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_ne!(response.text(), "static");
    }
}
