//! CLI definition and command handling

pub mod commands;
mod context;
pub mod output;
mod parse;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::info;

use codepush_core::config::{
    config_dir, default_config_path, find_config, load_config, load_config_or_default,
    validate_config, ACCESS_KEY_ENV, SERVER_URL_ENV,
};
use codepush_core::{ClientConfig, Command, Dispatcher};

use commands::{
    AccessKeyCommand, AppCommand, CollaboratorCommand, CompletionsCommand, DeploymentCommand,
    LoginCommand, LogoutCommand, PatchCommand, PromoteCommand, ReleaseCommand,
    ReleaseCordovaCommand, ReleaseReactCommand, RollbackCommand,
};

/// CodePush - over-the-air updates for Cordova and React Native apps
#[derive(Debug, Parser)]
#[command(name = "code-push")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

impl From<OutputFormat> for codepush_core::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => Self::Text,
            OutputFormat::Json => Self::Json,
        }
    }
}

/// Where the session configuration comes from
#[derive(Debug, Clone, Default, Args)]
pub struct ConnectionArgs {
    /// Configuration file (defaults to ~/.code-push/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Access key, overriding the saved session
    #[arg(long, global = true, env = ACCESS_KEY_ENV, hide_env_values = true)]
    pub access_key: Option<String>,

    /// Management server URL
    #[arg(long, global = true, env = SERVER_URL_ENV)]
    pub server_url: Option<String>,
}

impl ConnectionArgs {
    /// Load the saved configuration with command-line overrides applied
    pub fn load(&self) -> codepush_core::Result<ClientConfig> {
        let saved = match &self.config {
            Some(path) if path.is_file() => load_config(path)?,
            Some(_) => ClientConfig::default(),
            None => match config_dir() {
                Some(dir) => load_config_or_default(&dir)?.0,
                None => ClientConfig::default(),
            },
        };

        let config = saved.with_overrides(self.access_key.clone(), self.server_url.clone());
        validate_config(&config)?;
        Ok(config)
    }

    /// File the session is saved to and removed from
    pub fn config_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config {
            return Some(path.clone());
        }
        let dir = config_dir()?;
        Some(find_config(&dir).unwrap_or_else(|| default_config_path(&dir)))
    }
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage access keys associated with your account
    #[command(subcommand)]
    AccessKey(AccessKeyCommand),

    /// Manage your apps
    #[command(subcommand)]
    App(AppCommand),

    /// Manage the collaborators of an app
    #[command(subcommand)]
    Collaborator(CollaboratorCommand),

    /// Manage the deployments of an app
    #[command(subcommand)]
    Deployment(DeploymentCommand),

    /// Update the metadata of an existing release
    Patch(PatchCommand),

    /// Promote the latest release of one deployment into another
    Promote(PromoteCommand),

    /// Release an update to an app deployment
    Release(ReleaseCommand),

    /// Release a Cordova update to an app deployment
    ReleaseCordova(ReleaseCordovaCommand),

    /// Release a React Native update to an app deployment
    ReleaseReact(ReleaseReactCommand),

    /// Roll back the latest release of an app deployment
    Rollback(RollbackCommand),

    /// Display the account info for the current session
    Whoami,

    /// Authenticate with the CodePush server
    Login(LoginCommand),

    /// Log out of the current session
    Logout(LogoutCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<()> {
        let format = self.format.into();
        let command = match self.command {
            Commands::Login(cmd) => return cmd.execute(&self.connection),
            Commands::Logout(cmd) => return cmd.execute(&self.connection),
            Commands::Completions(cmd) => return cmd.execute(),
            Commands::AccessKey(cmd) => cmd.into_command(format),
            Commands::App(cmd) => cmd.into_command(format),
            Commands::Collaborator(cmd) => cmd.into_command(format),
            Commands::Deployment(cmd) => cmd.into_command(format),
            Commands::Patch(cmd) => cmd.into_command(),
            Commands::Promote(cmd) => cmd.into_command(),
            Commands::Release(cmd) => cmd.into_command(),
            Commands::ReleaseCordova(cmd) => cmd.into_command(),
            Commands::ReleaseReact(cmd) => cmd.into_command(),
            Commands::Rollback(cmd) => cmd.into_command(),
            Commands::Whoami => Command::Whoami,
        };

        dispatch(command, &self.connection)
    }
}

/// Run a management command against the configured server
fn dispatch(command: Command, connection: &ConnectionArgs) -> anyhow::Result<()> {
    info!(command = command.name(), "executing command");
    let config = connection.load()?;
    let session = context::build_session(&config)?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(Dispatcher::new(&session).execute(command))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_format_after_subcommand() {
        let cli = Cli::try_parse_from(["code-push", "app", "ls", "--format", "json"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_explicit_config_path_is_used_for_session() {
        let connection = ConnectionArgs {
            config: Some(PathBuf::from("/tmp/session.yaml")),
            ..Default::default()
        };
        assert_eq!(
            connection.config_path(),
            Some(PathBuf::from("/tmp/session.yaml"))
        );
    }

    #[test]
    fn test_overrides_apply_to_missing_config() {
        let temp = tempfile::TempDir::new().unwrap();
        let connection = ConnectionArgs {
            config: Some(temp.path().join("absent.toml")),
            access_key: Some("key".to_string()),
            server_url: Some("https://codepush.example.com".to_string()),
        };

        let config = connection.load().unwrap();
        assert_eq!(config.access_key.as_deref(), Some("key"));
        assert_eq!(config.server_url, "https://codepush.example.com");
    }

    #[test]
    fn test_invalid_server_override_is_rejected() {
        let temp = tempfile::TempDir::new().unwrap();
        let connection = ConnectionArgs {
            config: Some(temp.path().join("absent.toml")),
            access_key: None,
            server_url: Some("ftp://codepush.example.com".to_string()),
        };

        let err = connection.load().unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
