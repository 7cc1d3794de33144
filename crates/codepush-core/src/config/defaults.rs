//! Default configuration values

use std::path::PathBuf;

/// Management service used when none is configured
pub const DEFAULT_SERVER_URL: &str = "https://codepush.appcenter.ms";

/// Directory under the home directory holding config and logs
pub const CONFIG_DIR_NAME: &str = ".code-push";

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "config.toml";

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "config.yaml";

/// Environment variable overriding the stored access key
pub const ACCESS_KEY_ENV: &str = "CODE_PUSH_ACCESS_KEY";

/// Environment variable overriding the server URL
pub const SERVER_URL_ENV: &str = "CODE_PUSH_SERVER_URL";

/// Get list of config file names to search for, in priority order
pub fn config_file_names() -> Vec<&'static str> {
    vec![DEFAULT_CONFIG_TOML, DEFAULT_CONFIG_YAML, "config.yml"]
}

/// `~/.code-push`, when a home directory is known
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR_NAME))
}

/// `~/.code-push/logs`
pub fn log_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}
