use gateway_types::GatewayConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const CONFIG_DIR: &str = "gemini-gateway";
const CONFIG_FILE: &str = "gateway.json";

/// `<config_dir>/gemini-gateway/gateway.json`
pub fn default_config_path() -> Result<PathBuf, String> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
        .ok_or_else(|| "Failed to resolve user config directory".to_string())
}

/// Load configuration from `path`, falling back to defaults when the file does not exist.
pub fn load_config_from(path: &Path) -> Result<GatewayConfig, String> {
    if !path.exists() {
        debug!("[Config] {} not found, using defaults", path.display());
        return Ok(GatewayConfig::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;
    let config: GatewayConfig = serde_json::from_str(&content)
        .map_err(|e| format!("Failed to parse config {}: {}", path.display(), e))?;

    info!("[Config] Loaded {}", path.display());
    Ok(config)
}

/// Load from an explicit path, or the default location.
pub fn load_config(explicit: Option<&Path>) -> Result<GatewayConfig, String> {
    match explicit {
        Some(path) => load_config_from(path),
        None => load_config_from(&default_config_path()?),
    }
}

/// Write pretty JSON atomically (temp file, then rename).
pub fn save_config_to(config: &GatewayConfig, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
    }

    let content = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;

    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, content).map_err(|e| format!("Failed to write temp config: {}", e))?;
    fs::rename(&temp_path, path).map_err(|e| format!("Failed to save config: {}", e))
}

pub fn save_config(config: &GatewayConfig, explicit: Option<&Path>) -> Result<PathBuf, String> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => default_config_path()?,
    };
    save_config_to(config, &path)?;
    Ok(path)
}

/// Command-line / environment values that win over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
    pub upstream_base_url: Option<String>,
    pub static_dir: Option<String>,
    pub log_dir: Option<String>,
    pub allow_lan_access: Option<bool>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut GatewayConfig) {
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(url) = &self.upstream_base_url {
            config.upstream_base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(dir) = &self.static_dir {
            config.static_dir = dir.clone();
        }
        if let Some(dir) = &self.log_dir {
            config.log_dir = Some(dir.clone());
        }
        if let Some(lan) = self.allow_lan_access {
            config.allow_lan_access = lan;
        }
    }
}

/// Defaults, then file, then overrides; validated.
pub fn resolve_config(
    explicit: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<GatewayConfig, String> {
    let mut config = load_config(explicit)?;
    overrides.apply(&mut config);
    config.check()?;
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, GatewayConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);
        let config = GatewayConfig { port: 9123, ..GatewayConfig::default() };

        save_config_to(&config, &path).unwrap();
        assert_eq!(load_config_from(&path).unwrap().port, 9123);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "{ not json").unwrap();
        assert!(load_config_from(&path).unwrap_err().contains("Failed to parse"));
    }

    #[test]
    fn test_overrides_win_and_are_validated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{"port": 9000, "static_dir": "/srv/www"}"#).unwrap();

        let overrides = ConfigOverrides {
            port: Some(9500),
            upstream_base_url: Some("http://localhost:8089/".into()),
            ..ConfigOverrides::default()
        };
        let config = resolve_config(Some(&path), &overrides).unwrap();
        assert_eq!(config.port, 9500);
        assert_eq!(config.static_dir, "/srv/www");
        assert_eq!(config.upstream_base_url, "http://localhost:8089");

        let bad = ConfigOverrides { upstream_base_url: Some("nope".into()), ..ConfigOverrides::default() };
        assert!(resolve_config(Some(&path), &bad).is_err());
    }
}
