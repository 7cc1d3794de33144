//! Configuration validation

use tracing::debug;
use url::Url;

use crate::error::{ConfigError, Result};

use super::types::ClientConfig;

/// Validate configuration
pub fn validate_config(config: &ClientConfig) -> Result<()> {
    debug!("validating configuration");
    validate_url("server_url", &config.server_url)?;

    if let Some(proxy) = &config.proxy {
        validate_url("proxy", proxy)?;
    }

    if config.bundler_timeout_secs == Some(0) {
        return Err(ConfigError::InvalidValue {
            field: "bundler_timeout_secs".to_string(),
            message: "must be greater than 0".to_string(),
        }
        .into());
    }

    if config.access_key.as_deref() == Some("") {
        return Err(ConfigError::InvalidValue {
            field: "access_key".to_string(),
            message: "access key cannot be empty".to_string(),
        }
        .into());
    }

    debug!("configuration validation passed");
    Ok(())
}

fn validate_url(field: &str, value: &str) -> Result<()> {
    let url = Url::parse(value).map_err(|e| ConfigError::InvalidValue {
        field: field.to_string(),
        message: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            message: "must be an http or https URL".to_string(),
        }
        .into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        let config = ClientConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_rejects_non_http_server() {
        let config = ClientConfig {
            server_url: "ftp://codepush.example.com".to_string(),
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());

        let config = ClientConfig {
            server_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let config = ClientConfig {
            bundler_timeout_secs: Some(0),
            ..Default::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("bundler_timeout_secs"));
    }

    #[test]
    fn test_validate_empty_access_key() {
        let config = ClientConfig {
            access_key: Some(String::new()),
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }
}
