use anyhow::{bail, Result};
use colored::Colorize;
use gateway_core::gateway::common::mask_credential;
use gateway_core::modules::config as core_config;
use gateway_types::GatewayConfig;

use crate::cli::Cli;

pub fn show_config(cli: &Cli, json: bool) -> Result<()> {
    let config = core_config::resolve_config(cli.config.as_deref(), &cli.overrides())
        .map_err(anyhow::Error::msg)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("{}", "Gateway Configuration:".cyan().bold());
    println!("  Listen: {}:{}", config.get_bind_address(), config.port);
    println!("  Upstream: {}/{}", config.upstream_base_url, config.api_version);
    println!("  Inline limit: {} bytes", config.inline_limit_bytes);
    println!(
        "  File polling: {} attempts every {}s",
        config.poll_max_attempts, config.poll_interval_secs
    );
    println!("  Request timeout: {}s", config.request_timeout_secs);
    println!("  Image models: {}", config.image_generation_models.join(", "));
    println!("  Static dir: {}", config.static_dir);
    println!("  Log dir: {}", config.log_dir.as_deref().unwrap_or("(stdout only)"));
    if let Ok(key) = std::env::var("GEMINI_API_KEY") {
        println!("  {} GEMINI_API_KEY is set ({}) but keys are supplied per request", "!".yellow(), mask_credential(&key));
    }
    Ok(())
}

pub fn init_config(cli: &Cli, force: bool) -> Result<()> {
    let path = match cli.config.clone() {
        Some(path) => path,
        None => core_config::default_config_path().map_err(anyhow::Error::msg)?,
    };

    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    let saved = core_config::save_config(&GatewayConfig::default(), Some(&path))
        .map_err(anyhow::Error::msg)?;
    println!("{} Wrote default configuration to {}", "✓".green(), saved.display());
    Ok(())
}
