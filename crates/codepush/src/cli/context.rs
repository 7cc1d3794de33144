//! Wiring of the interactive collaborators into a session

use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use dialoguer::Confirm;
use tracing::debug;

use codepush_core::{
    ClientConfig, CodePushError, ConfigError, Prompter, RemoteError, Session, SystemProcessRunner,
};
use codepush_sdk::HttpSdk;

use super::output::ConsoleSink;

/// Confirmation prompt on the terminal, defaulting to "no"
#[derive(Debug, Clone, Copy, Default)]
pub struct DialoguerPrompter;

#[async_trait]
impl Prompter for DialoguerPrompter {
    async fn confirm(&self, message: &str) -> io::Result<bool> {
        let prompt = message.to_string();
        tokio::task::spawn_blocking(move || {
            Confirm::new()
                .with_prompt(prompt)
                .default(false)
                .interact()
                .map_err(io::Error::other)
        })
        .await
        .map_err(io::Error::other)?
    }
}

/// Build an HTTP client for the configured server and access key
pub fn connect(config: &ClientConfig) -> Result<HttpSdk, CodePushError> {
    let access_key = config
        .access_key
        .as_deref()
        .filter(|key| !key.is_empty())
        .ok_or(ConfigError::NotLoggedIn)?;

    debug!(server = %config.server_url, "connecting to management server");
    HttpSdk::new(&config.server_url, access_key, config.proxy.as_deref())
        .map_err(|e| CodePushError::from(RemoteError::from(e)))
}

/// Assemble the session a dispatched command runs in
pub fn build_session(config: &ClientConfig) -> Result<Session, CodePushError> {
    let sdk = connect(config)?;
    let cwd = std::env::current_dir()?;

    Ok(Session::new(
        Arc::new(sdk),
        Arc::new(DialoguerPrompter),
        Arc::new(ConsoleSink),
        Arc::new(SystemProcessRunner),
        cwd,
    )
    .with_bundler_timeout(config.bundler_timeout()))
}
