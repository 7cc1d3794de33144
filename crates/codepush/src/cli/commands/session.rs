//! Login and logout commands

use clap::Args;
use tracing::info;

use codepush_core::config::{remove_config, save_config};
use codepush_core::{CodePushError, ConfigError, ManagementSdk};

use crate::cli::context::connect;
use crate::cli::output;
use crate::cli::ConnectionArgs;

/// Authenticate with an access key and save the session
#[derive(Debug, Args)]
pub struct LoginCommand {}

impl LoginCommand {
    /// Execute the login command
    pub fn execute(&self, connection: &ConnectionArgs) -> anyhow::Result<()> {
        info!("executing login command");
        let config = connection.load()?;
        if !config.is_logged_in() {
            return Err(CodePushError::from(ConfigError::InvalidValue {
                field: "access_key".to_string(),
                message: "an access key is required, pass --access-key or set CODE_PUSH_ACCESS_KEY"
                    .to_string(),
            })
            .into());
        }

        let sdk = connect(&config)?;
        let rt = tokio::runtime::Runtime::new()?;
        let account = rt
            .block_on(sdk.get_account_info())
            .map_err(CodePushError::from)?;

        let path = connection.config_path().ok_or_else(|| {
            CodePushError::from(ConfigError::InvalidValue {
                field: "config".to_string(),
                message: "unable to locate the home directory, pass --config".to_string(),
            })
        })?;
        save_config(&path, &config)?;

        output::success(&format!(
            "Successfully logged-in as \"{}\". Your session file was written to {}. You can run the code-push logout command at any time to delete this file and terminate your session.",
            account.email,
            path.display()
        ));
        Ok(())
    }
}

/// Delete the saved session
#[derive(Debug, Args)]
pub struct LogoutCommand {}

impl LogoutCommand {
    /// Execute the logout command
    pub fn execute(&self, connection: &ConnectionArgs) -> anyhow::Result<()> {
        info!("executing logout command");
        let Some(path) = connection.config_path() else {
            return Err(CodePushError::from(ConfigError::NotLoggedIn).into());
        };

        let removed = match (&connection.config, path.parent()) {
            (Some(_), _) if path.is_file() => {
                std::fs::remove_file(&path)
                    .map_err(|e| CodePushError::from(ConfigError::Io(e)))?;
                1
            }
            (None, Some(dir)) => remove_config(dir)?,
            _ => 0,
        };

        if removed == 0 {
            output::warning("You are not currently logged in.");
        } else {
            output::success(&format!(
                "Successfully logged-out. The session file located at {} has been deleted.",
                path.display()
            ));
        }
        Ok(())
    }
}
