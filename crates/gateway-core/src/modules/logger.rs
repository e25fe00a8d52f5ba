//! Tracing subscriber setup.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_PREFIX: &str = "gateway.log";
const DEFAULT_LEVEL: &str = "info";

/// Explicit directive wins, then `RUST_LOG`, then `info`.
pub fn build_filter(directive: Option<&str>) -> EnvFilter {
    if let Some(filter) = directive.and_then(|d| EnvFilter::try_new(d).ok()) {
        return filter;
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

/// Install the global subscriber: stdout, plus a daily rolling file when `log_dir` is set.
///
/// The returned guard flushes the file writer and must live as long as the process.
pub fn init_logger(
    directive: Option<&str>,
    log_dir: Option<&Path>,
) -> Result<Option<WorkerGuard>, String> {
    let filter = build_filter(directive);
    let stdout_layer = fmt::layer().with_target(false);

    let Some(dir) = log_dir else {
        tracing_subscriber::registry()
            .with(filter)
            .with(stdout_layer)
            .try_init()
            .map_err(|e| format!("Failed to initialize logging: {}", e))?;
        return Ok(None);
    };

    std::fs::create_dir_all(dir)
        .map_err(|e| format!("Failed to create log directory {}: {}", dir.display(), e))?;
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX));

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .try_init()
        .map_err(|e| format!("Failed to initialize logging: {}", e))?;

    Ok(Some(guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_directive_is_used() {
        assert_eq!(build_filter(Some("debug")).to_string(), "debug");
    }

    #[test]
    fn test_invalid_directive_falls_back() {
        let filter = build_filter(Some("[[["));
        assert!(!filter.to_string().is_empty());
    }
}
