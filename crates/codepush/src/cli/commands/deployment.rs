//! Deployment commands

use clap::{Args, Subcommand};

use codepush_core::command::{
    DeploymentAdd, DeploymentHistory, DeploymentList, DeploymentRename, DeploymentTarget,
};
use codepush_core::{Command, OutputFormat};

/// Deployment subcommands
#[derive(Debug, Subcommand)]
pub enum DeploymentCommand {
    /// Add a new deployment to an app
    Add(TargetArgs),

    /// Clear the release history of a deployment
    Clear(TargetArgs),

    /// Display the release history of a deployment
    #[command(alias = "h")]
    History(HistoryArgs),

    /// List the deployments of an app
    #[command(alias = "list")]
    Ls(ListArgs),

    /// Remove a deployment from an app
    #[command(alias = "remove")]
    Rm(TargetArgs),

    /// Rename an existing deployment
    Rename(RenameArgs),
}

#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Name of the app
    pub app_name: String,

    /// Name of the deployment
    pub deployment_name: String,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Name of the app
    pub app_name: String,

    /// Show the deployment keys
    #[arg(short = 'k', long, alias = "displayKeys")]
    pub display_keys: bool,
}

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Name of the app
    pub app_name: String,

    /// Name of the deployment
    pub deployment_name: String,

    /// Show who released each update
    #[arg(short = 'a', long, alias = "displayAuthor")]
    pub display_author: bool,
}

#[derive(Debug, Args)]
pub struct RenameArgs {
    /// Name of the app
    pub app_name: String,

    /// Current name of the deployment
    pub current_deployment_name: String,

    /// New name of the deployment
    pub new_deployment_name: String,
}

impl DeploymentCommand {
    pub fn into_command(self, format: OutputFormat) -> Command {
        match self {
            Self::Add(args) => Command::DeploymentAdd(DeploymentAdd {
                app_name: args.app_name,
                deployment_name: args.deployment_name,
            }),
            Self::Clear(args) => Command::DeploymentHistoryClear(args.into()),
            Self::History(args) => Command::DeploymentHistory(DeploymentHistory {
                app_name: args.app_name,
                deployment_name: args.deployment_name,
                format,
                display_author: args.display_author,
            }),
            Self::Ls(args) => Command::DeploymentList(DeploymentList {
                app_name: args.app_name,
                format,
                display_keys: args.display_keys,
            }),
            Self::Rm(args) => Command::DeploymentRemove(args.into()),
            Self::Rename(args) => Command::DeploymentRename(DeploymentRename {
                app_name: args.app_name,
                current_deployment_name: args.current_deployment_name,
                new_deployment_name: args.new_deployment_name,
            }),
        }
    }
}

impl From<TargetArgs> for DeploymentTarget {
    fn from(args: TargetArgs) -> Self {
        Self {
            app_name: args.app_name,
            deployment_name: args.deployment_name,
        }
    }
}
