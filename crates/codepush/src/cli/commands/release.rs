//! Release commands

use std::path::PathBuf;

use clap::Args;

use codepush_core::command::{Release, ReleaseCordova, ReleaseReact};
use codepush_core::Command;

use crate::cli::parse::parse_rollout;

const DEFAULT_DEPLOYMENT: &str = "Staging";

/// Options shared by every release command
#[derive(Debug, Args)]
pub struct ReleaseOptions {
    /// Deployment to release the update to
    #[arg(short, long, alias = "deploymentName", default_value = DEFAULT_DEPLOYMENT)]
    pub deployment_name: String,

    /// Description of the changes made to the app in this release
    #[arg(long, alias = "des")]
    pub description: Option<String>,

    /// Prevent the release from being downloadable
    #[arg(short = 'x', long)]
    pub disabled: bool,

    /// Mark the release as mandatory
    #[arg(short, long)]
    pub mandatory: bool,

    /// Percentage of users eligible to receive the release (1-100)
    #[arg(short, long, value_parser = parse_rollout)]
    pub rollout: Option<u8>,
}

/// Release an update from a directory or file
#[derive(Debug, Args)]
pub struct ReleaseCommand {
    /// Name of the app
    pub app_name: String,

    /// Directory or single file containing the update
    pub update_contents_path: PathBuf,

    /// Semver range of the binary versions this release targets
    pub target_binary_version: String,

    #[command(flatten)]
    pub options: ReleaseOptions,
}

impl ReleaseCommand {
    pub fn into_command(self) -> Command {
        Command::Release(Release {
            app_name: self.app_name,
            deployment_name: self.options.deployment_name,
            package: self.update_contents_path,
            app_store_version: self.target_binary_version,
            description: self.options.description,
            disabled: self.options.disabled,
            mandatory: self.options.mandatory,
            rollout: self.options.rollout,
        })
    }
}

/// Build and release a Cordova project
#[derive(Debug, Args)]
pub struct ReleaseCordovaCommand {
    /// Name of the app
    pub app_name: String,

    /// Platform to release for (ios or android)
    pub platform: String,

    /// Run "cordova build" instead of "cordova prepare"
    #[arg(short, long)]
    pub build: bool,

    /// Semver range of the targeted binary versions; read from config.xml when omitted
    #[arg(short, long, alias = "targetBinaryVersion")]
    pub target_binary_version: Option<String>,

    #[command(flatten)]
    pub options: ReleaseOptions,
}

impl ReleaseCordovaCommand {
    pub fn into_command(self) -> Command {
        Command::ReleaseCordova(ReleaseCordova {
            app_name: self.app_name,
            deployment_name: self.options.deployment_name,
            platform: self.platform,
            build: self.build,
            app_store_version: self.target_binary_version,
            description: self.options.description,
            disabled: self.options.disabled,
            mandatory: self.options.mandatory,
            rollout: self.options.rollout,
        })
    }
}

/// Bundle and release a React Native project
#[derive(Debug, Args)]
pub struct ReleaseReactCommand {
    /// Name of the app
    pub app_name: String,

    /// Platform to release for (ios, android or windows)
    pub platform: String,

    /// Name of the generated JS bundle
    #[arg(short, long, alias = "bundleName")]
    pub bundle_name: Option<String>,

    /// Produce a development bundle
    #[arg(long)]
    pub development: bool,

    /// Entry JS file of the app
    #[arg(short, long, alias = "entryFile")]
    pub entry_file: Option<String>,

    /// Directory the bundle and assets are written to
    #[arg(short, long, alias = "outputDir")]
    pub output_dir: Option<PathBuf>,

    /// Path the source map is written to
    #[arg(short, long, alias = "sourcemapOutput")]
    pub sourcemap_output: Option<PathBuf>,

    /// Semver range of the targeted binary versions; read from package.json when omitted
    #[arg(short, long, alias = "targetBinaryVersion")]
    pub target_binary_version: Option<String>,

    #[command(flatten)]
    pub options: ReleaseOptions,
}

impl ReleaseReactCommand {
    pub fn into_command(self) -> Command {
        Command::ReleaseReact(ReleaseReact {
            app_name: self.app_name,
            deployment_name: self.options.deployment_name,
            platform: self.platform,
            app_store_version: self.target_binary_version,
            bundle_name: self.bundle_name,
            entry_file: self.entry_file,
            development: self.development,
            sourcemap_output: self.sourcemap_output,
            output_dir: self.output_dir,
            description: self.options.description,
            disabled: self.options.disabled,
            mandatory: self.options.mandatory,
            rollout: self.options.rollout,
        })
    }
}
