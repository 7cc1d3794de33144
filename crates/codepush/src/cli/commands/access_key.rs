//! Access key commands

use std::time::Duration;

use clap::{Args, Subcommand};

use codepush_core::command::{AccessKeyAdd, AccessKeyEdit, AccessKeyRemove, ListOptions};
use codepush_core::{Command, OutputFormat};

use crate::cli::parse::parse_max_age;

/// Access key subcommands
#[derive(Debug, Subcommand)]
pub enum AccessKeyCommand {
    /// Create a new access key associated with your account
    Add(AddArgs),

    /// Update the name and/or expiry of an existing access key
    Patch(PatchArgs),

    /// List the access keys associated with your account
    #[command(alias = "list")]
    Ls,

    /// Remove an existing access key
    #[command(alias = "remove")]
    Rm(RemoveArgs),
}

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Name used to identify the key
    pub name: String,

    /// Lifetime of the key, e.g. "60d", "5h", "30m"
    #[arg(long, alias = "ttl", alias = "maxAge", value_parser = parse_max_age)]
    pub max_age: Option<Duration>,
}

#[derive(Debug, Args)]
pub struct PatchArgs {
    /// Current name of the key
    pub name: String,

    /// New name for the key
    #[arg(long = "name")]
    pub new_name: Option<String>,

    /// New lifetime of the key, starting now
    #[arg(long, alias = "ttl", alias = "maxAge", value_parser = parse_max_age)]
    pub max_age: Option<Duration>,
}

#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// Name of the key to remove
    pub name: String,
}

impl AccessKeyCommand {
    pub fn into_command(self, format: OutputFormat) -> Command {
        match self {
            Self::Add(args) => Command::AccessKeyAdd(AccessKeyAdd {
                friendly_name: args.name,
                max_age: args.max_age,
            }),
            Self::Patch(args) => Command::AccessKeyEdit(AccessKeyEdit {
                old_friendly_name: args.name,
                new_friendly_name: args.new_name,
                max_age: args.max_age,
            }),
            Self::Ls => Command::AccessKeyList(ListOptions { format }),
            Self::Rm(args) => Command::AccessKeyRemove(AccessKeyRemove {
                access_key: args.name,
            }),
        }
    }
}
