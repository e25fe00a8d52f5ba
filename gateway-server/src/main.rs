//! Gemini Gateway - Headless Daemon
//!
//! Serves the native `/chat` endpoint, the Gemini-compatible
//! `/v1beta/models/{model}:{action}` endpoint, health checks and the
//! static chat client.

use anyhow::{Context, Result};
use clap::Parser;
use gateway_core::modules::{config as core_config, logger};
use gateway_core::AppState;
use std::path::PathBuf;
use tracing::info;

mod cli;
mod config_commands;
mod router;
mod server_utils;

use cli::{Cli, Commands, ConfigCommands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Config(ConfigCommands::Show { json })) => {
            config_commands::show_config(&cli, *json)
        },
        Some(Commands::Config(ConfigCommands::Init { force })) => {
            config_commands::init_config(&cli, *force)
        },
        Some(Commands::Serve) | None => run_server(&cli).await,
    }
}

async fn run_server(cli: &Cli) -> Result<()> {
    let config = core_config::resolve_config(cli.config.as_deref(), &cli.overrides())
        .map_err(anyhow::Error::msg)
        .context("Failed to load gateway configuration")?;

    let log_dir = config.log_dir.as_ref().map(PathBuf::from);
    // Dropping the guard stops the file writer, so it lives until main returns.
    let _log_guard = logger::init_logger(Some(&cli.log_level), log_dir.as_deref())
        .map_err(anyhow::Error::msg)?;

    info!(
        "Gemini Gateway v{} starting (upstream {}/{})",
        env!("CARGO_PKG_VERSION"),
        config.upstream_base_url,
        config.api_version
    );

    let listener = server_utils::create_listener(&config).await?;
    let state = AppState::from_config(config).context("Failed to build upstream client")?;
    let app = router::build_router(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(server_utils::shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
