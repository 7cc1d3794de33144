//! App management commands

use clap::{Args, Subcommand};

use codepush_core::command::{AppAdd, AppRemove, AppRename, AppTransfer, ListOptions};
use codepush_core::{Command, OutputFormat};

/// App subcommands
#[derive(Debug, Subcommand)]
pub enum AppCommand {
    /// Add a new app to your account
    Add(AppNameArgs),

    /// List the apps associated with your account
    #[command(alias = "list")]
    Ls,

    /// Remove an app from your account
    #[command(alias = "remove")]
    Rm(AppNameArgs),

    /// Rename an existing app
    Rename(RenameArgs),

    /// Transfer the ownership of an app to another account
    Transfer(TransferArgs),
}

#[derive(Debug, Args)]
pub struct AppNameArgs {
    /// Name of the app
    pub app_name: String,
}

#[derive(Debug, Args)]
pub struct RenameArgs {
    /// Current name of the app
    pub current_app_name: String,

    /// New name of the app
    pub new_app_name: String,
}

#[derive(Debug, Args)]
pub struct TransferArgs {
    /// Name of the app
    pub app_name: String,

    /// Email of the account that becomes the owner
    pub email: String,
}

impl AppCommand {
    pub fn into_command(self, format: OutputFormat) -> Command {
        match self {
            Self::Add(args) => Command::AppAdd(AppAdd {
                app_name: args.app_name,
            }),
            Self::Ls => Command::AppList(ListOptions { format }),
            Self::Rm(args) => Command::AppRemove(AppRemove {
                app_name: args.app_name,
            }),
            Self::Rename(args) => Command::AppRename(AppRename {
                current_app_name: args.current_app_name,
                new_app_name: args.new_app_name,
            }),
            Self::Transfer(args) => Command::AppTransfer(AppTransfer {
                app_name: args.app_name,
                email: args.email,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: AppCommand,
    }

    fn parse(args: &[&str], format: OutputFormat) -> Command {
        let mut argv = vec!["app"];
        argv.extend_from_slice(args);
        TestCli::try_parse_from(argv)
            .unwrap()
            .command
            .into_command(format)
    }

    #[test]
    fn test_list_uses_requested_format() {
        assert_eq!(
            parse(&["ls"], OutputFormat::Json),
            Command::AppList(ListOptions {
                format: OutputFormat::Json
            })
        );
    }

    #[test]
    fn test_rename() {
        assert_eq!(
            parse(&["rename", "a", "b"], OutputFormat::Text),
            Command::AppRename(AppRename {
                current_app_name: "a".to_string(),
                new_app_name: "b".to_string(),
            })
        );
    }

    #[test]
    fn test_transfer_requires_email() {
        assert!(TestCli::try_parse_from(["app", "transfer", "a"]).is_err());
    }
}
