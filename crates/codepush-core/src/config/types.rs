//! Configuration types

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults::DEFAULT_SERVER_URL;

/// Settings of the command-line client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Access key used to authenticate with the management service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,

    /// Management service base URL
    pub server_url: String,

    /// HTTP(S) proxy for management requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,

    /// Upper bound on a single `react-native bundle` run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundler_timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            access_key: None,
            server_url: DEFAULT_SERVER_URL.to_string(),
            proxy: None,
            bundler_timeout_secs: None,
        }
    }
}

impl ClientConfig {
    pub fn bundler_timeout(&self) -> Option<Duration> {
        self.bundler_timeout_secs.map(Duration::from_secs)
    }

    pub fn is_logged_in(&self) -> bool {
        self.access_key.as_deref().is_some_and(|key| !key.is_empty())
    }

    /// Apply command-line or environment overrides
    pub fn with_overrides(mut self, access_key: Option<String>, server_url: Option<String>) -> Self {
        if let Some(key) = access_key {
            self.access_key = Some(key);
        }
        if let Some(url) = server_url {
            self.server_url = url;
        }
        self
    }
}
