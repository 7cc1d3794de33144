//! Commands that change existing releases

use clap::Args;

use codepush_core::command::{Patch, Promote, Rollback};
use codepush_core::Command;

use crate::cli::parse::parse_rollout;

/// Release metadata that can be changed after the fact
///
/// Only flags that are passed end up in the request.
#[derive(Debug, Args)]
pub struct MetadataArgs {
    /// Semver range of the targeted binary versions
    #[arg(short, long, alias = "targetBinaryVersion")]
    pub target_binary_version: Option<String>,

    /// Description of the changes made to the app in this release
    #[arg(long, alias = "des")]
    pub description: Option<String>,

    /// Whether the release can be downloaded
    #[arg(short = 'x', long, num_args = 0..=1, default_missing_value = "true")]
    pub disabled: Option<bool>,

    /// Whether the release is mandatory
    #[arg(short, long, num_args = 0..=1, default_missing_value = "true")]
    pub mandatory: Option<bool>,

    /// Percentage of users eligible to receive the release (1-100)
    #[arg(short, long, value_parser = parse_rollout)]
    pub rollout: Option<u8>,
}

/// Update the metadata of an existing release
#[derive(Debug, Args)]
pub struct PatchCommand {
    /// Name of the app
    pub app_name: String,

    /// Name of the deployment
    pub deployment_name: String,

    /// Label of the release to patch; the latest release when omitted
    #[arg(short, long)]
    pub label: Option<String>,

    #[command(flatten)]
    pub metadata: MetadataArgs,
}

impl PatchCommand {
    pub fn into_command(self) -> Command {
        Command::Patch(Patch {
            app_name: self.app_name,
            deployment_name: self.deployment_name,
            label: self.label,
            app_store_version: self.metadata.target_binary_version,
            description: self.metadata.description,
            disabled: self.metadata.disabled,
            mandatory: self.metadata.mandatory,
            rollout: self.metadata.rollout,
        })
    }
}

/// Promote the latest release of one deployment into another
#[derive(Debug, Args)]
pub struct PromoteCommand {
    /// Name of the app
    pub app_name: String,

    /// Deployment to promote from
    pub source_deployment_name: String,

    /// Deployment to promote to
    pub dest_deployment_name: String,

    #[command(flatten)]
    pub metadata: MetadataArgs,
}

impl PromoteCommand {
    pub fn into_command(self) -> Command {
        Command::Promote(Promote {
            app_name: self.app_name,
            source_deployment_name: self.source_deployment_name,
            dest_deployment_name: self.dest_deployment_name,
            app_store_version: self.metadata.target_binary_version,
            description: self.metadata.description,
            disabled: self.metadata.disabled,
            mandatory: self.metadata.mandatory,
            rollout: self.metadata.rollout,
        })
    }
}

/// Roll back the latest release of a deployment
#[derive(Debug, Args)]
pub struct RollbackCommand {
    /// Name of the app
    pub app_name: String,

    /// Name of the deployment
    pub deployment_name: String,

    /// Label of the release to roll back to; the previous release when omitted
    #[arg(long, alias = "targetRelease")]
    pub target_release: Option<String>,
}

impl RollbackCommand {
    pub fn into_command(self) -> Command {
        Command::Rollback(Rollback {
            app_name: self.app_name,
            deployment_name: self.deployment_name,
            target_release: self.target_release,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    enum TestCli {
        Patch(PatchCommand),
        Promote(PromoteCommand),
        Rollback(RollbackCommand),
    }

    fn parse(args: &[&str]) -> Command {
        let mut argv = vec!["code-push"];
        argv.extend_from_slice(args);
        match TestCli::try_parse_from(argv).unwrap() {
            TestCli::Patch(cmd) => cmd.into_command(),
            TestCli::Promote(cmd) => cmd.into_command(),
            TestCli::Rollback(cmd) => cmd.into_command(),
        }
    }

    #[test]
    fn test_patch_keeps_unset_fields_empty() {
        assert_eq!(
            parse(&["patch", "MyApp", "Production", "-l", "v3", "--mandatory"]),
            Command::Patch(Patch {
                app_name: "MyApp".to_string(),
                deployment_name: "Production".to_string(),
                label: Some("v3".to_string()),
                mandatory: Some(true),
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_patch_explicit_false() {
        assert_eq!(
            parse(&["patch", "MyApp", "Production", "--disabled", "false"]),
            Command::Patch(Patch {
                app_name: "MyApp".to_string(),
                deployment_name: "Production".to_string(),
                disabled: Some(false),
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_promote() {
        assert_eq!(
            parse(&["promote", "MyApp", "Staging", "Production", "-r", "50", "-t", "~1.2"]),
            Command::Promote(Promote {
                app_name: "MyApp".to_string(),
                source_deployment_name: "Staging".to_string(),
                dest_deployment_name: "Production".to_string(),
                app_store_version: Some("~1.2".to_string()),
                rollout: Some(50),
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_rollback_target() {
        assert_eq!(
            parse(&["rollback", "MyApp", "Production", "--targetRelease", "v4"]),
            Command::Rollback(Rollback {
                app_name: "MyApp".to_string(),
                deployment_name: "Production".to_string(),
                target_release: Some("v4".to_string()),
            })
        );
    }
}
