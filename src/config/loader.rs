/// Configuration loader
use super::schema::Config;
use crate::error::ConfigError;
use std::fs;
use std::path::{Path, PathBuf};

/// Default config location: `<executable>.config` next to the binary
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let exe_path = std::env::current_exe().map_err(|e| ConfigError::Io {
        path: "<current executable>".to_string(),
        source: e,
    })?;

    Ok(PathBuf::from(format!("{}.config", exe_path.display())))
}

/// Load configuration from a JSON file
///
/// A missing file yields the default configuration so that environment
/// variables alone can drive the host. The result is not validated; call
/// `Config::validate` after applying overrides.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    serde_json::from_str(&config_content).map_err(ConfigError::Parse)
}

/// Write configuration back as pretty JSON
pub fn save_config(path: &Path, config: &Config) -> Result<(), ConfigError> {
    let json = serde_json::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    fs::write(path, json).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        source: e,
    })
}
