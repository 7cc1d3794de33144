//! Configuration loading and persistence

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{ConfigError, Result};

use super::defaults::{config_file_names, DEFAULT_CONFIG_TOML};
use super::types::ClientConfig;
use super::validation::validate_config;

fn is_toml(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "toml")
}

/// Load configuration from a file
pub fn load_config(path: &Path) -> Result<ClientConfig> {
    let format = if is_toml(path) { "TOML" } else { "YAML" };
    info!(path = %path.display(), format, "loading config");

    let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
    let parse_error = |message: String| ConfigError::ParseError {
        path: path.to_path_buf(),
        message,
    };

    let config: ClientConfig = if format == "TOML" {
        toml::from_str(&content).map_err(|e| parse_error(e.to_string()))?
    } else {
        serde_yaml::from_str(&content).map_err(|e| parse_error(e.to_string()))?
    };

    validate_config(&config)?;
    debug!(path = %path.display(), "config loaded and validated");
    Ok(config)
}

/// Find the first known config file in a directory
pub fn find_config(dir: &Path) -> Option<PathBuf> {
    debug!(dir = %dir.display(), "searching for config file");
    let found = config_file_names()
        .into_iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file());

    match &found {
        Some(path) => info!(path = %path.display(), "found config file"),
        None => debug!("no config file found"),
    }
    found
}

/// Load configuration from a directory, falling back to defaults when absent
pub fn load_config_or_default(dir: &Path) -> Result<(ClientConfig, Option<PathBuf>)> {
    match find_config(dir) {
        Some(path) => Ok((load_config(&path)?, Some(path))),
        None => {
            debug!(dir = %dir.display(), "no config found, using defaults");
            Ok((ClientConfig::default(), None))
        }
    }
}

/// Write configuration to a file, TOML or YAML by extension
pub fn save_config(path: &Path, config: &ClientConfig) -> Result<()> {
    validate_config(config)?;

    let content = if is_toml(path) {
        toml::to_string_pretty(config).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
    } else {
        serde_yaml::to_string(config).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
    }
    std::fs::write(path, content).map_err(ConfigError::Io)?;
    info!(path = %path.display(), "config saved");
    Ok(())
}

/// Remove every known config file from a directory, returning how many were removed
pub fn remove_config(dir: &Path) -> Result<usize> {
    let mut removed = 0;
    for name in config_file_names() {
        let path = dir.join(name);
        if path.is_file() {
            std::fs::remove_file(&path).map_err(ConfigError::Io)?;
            info!(path = %path.display(), "config removed");
            removed += 1;
        }
    }
    if removed == 0 {
        warn!(dir = %dir.display(), "no config to remove");
    }
    Ok(removed)
}

/// Path new configuration is written to
pub fn default_config_path(dir: &Path) -> PathBuf {
    dir.join(DEFAULT_CONFIG_TOML)
}
