//! Collaborator commands

use clap::{Args, Subcommand};

use codepush_core::command::{CollaboratorChange, CollaboratorList};
use codepush_core::{Command, OutputFormat};

/// Collaborator subcommands
#[derive(Debug, Subcommand)]
pub enum CollaboratorCommand {
    /// Add a new collaborator to an app
    Add(ChangeArgs),

    /// List the collaborators of an app
    #[command(alias = "list")]
    Ls(ListArgs),

    /// Remove a collaborator from an app
    #[command(alias = "remove")]
    Rm(ChangeArgs),
}

#[derive(Debug, Args)]
pub struct ChangeArgs {
    /// Name of the app
    pub app_name: String,

    /// Email of the collaborator
    pub email: String,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Name of the app
    pub app_name: String,
}

impl CollaboratorCommand {
    pub fn into_command(self, format: OutputFormat) -> Command {
        match self {
            Self::Add(args) => Command::CollaboratorAdd(CollaboratorChange {
                app_name: args.app_name,
                email: args.email,
            }),
            Self::Ls(args) => Command::CollaboratorList(CollaboratorList {
                app_name: args.app_name,
                format,
            }),
            Self::Rm(args) => Command::CollaboratorRemove(CollaboratorChange {
                app_name: args.app_name,
                email: args.email,
            }),
        }
    }
}
