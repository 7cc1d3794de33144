//! Typed command model consumed by the dispatcher
//!
//! One variant per command kind, each carrying only the fields that command
//! needs. Commands are built by the argument parser and consumed once.

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

/// Rendering mode for list-type commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable tables
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// A single CLI invocation
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AccessKeyAdd(AccessKeyAdd),
    AccessKeyEdit(AccessKeyEdit),
    AccessKeyList(ListOptions),
    AccessKeyRemove(AccessKeyRemove),
    AppAdd(AppAdd),
    AppList(ListOptions),
    AppRemove(AppRemove),
    AppRename(AppRename),
    AppTransfer(AppTransfer),
    CollaboratorAdd(CollaboratorChange),
    CollaboratorList(CollaboratorList),
    CollaboratorRemove(CollaboratorChange),
    DeploymentAdd(DeploymentAdd),
    DeploymentList(DeploymentList),
    DeploymentRemove(DeploymentTarget),
    DeploymentRename(DeploymentRename),
    DeploymentHistory(DeploymentHistory),
    DeploymentHistoryClear(DeploymentTarget),
    Patch(Patch),
    Promote(Promote),
    Release(Release),
    ReleaseCordova(ReleaseCordova),
    ReleaseReact(ReleaseReact),
    Rollback(Rollback),
    Whoami,
}

impl Command {
    /// Kebab-case name of the command, as typed on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Self::AccessKeyAdd(_) => "access-key add",
            Self::AccessKeyEdit(_) => "access-key patch",
            Self::AccessKeyList(_) => "access-key ls",
            Self::AccessKeyRemove(_) => "access-key rm",
            Self::AppAdd(_) => "app add",
            Self::AppList(_) => "app ls",
            Self::AppRemove(_) => "app rm",
            Self::AppRename(_) => "app rename",
            Self::AppTransfer(_) => "app transfer",
            Self::CollaboratorAdd(_) => "collaborator add",
            Self::CollaboratorList(_) => "collaborator ls",
            Self::CollaboratorRemove(_) => "collaborator rm",
            Self::DeploymentAdd(_) => "deployment add",
            Self::DeploymentList(_) => "deployment ls",
            Self::DeploymentRemove(_) => "deployment rm",
            Self::DeploymentRename(_) => "deployment rename",
            Self::DeploymentHistory(_) => "deployment history",
            Self::DeploymentHistoryClear(_) => "deployment clear",
            Self::Patch(_) => "patch",
            Self::Promote(_) => "promote",
            Self::Release(_) => "release",
            Self::ReleaseCordova(_) => "release-cordova",
            Self::ReleaseReact(_) => "release-react",
            Self::Rollback(_) => "rollback",
            Self::Whoami => "whoami",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub format: OutputFormat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessKeyAdd {
    pub friendly_name: String,
    /// Lifetime of the key; the service default applies when unset
    pub max_age: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessKeyEdit {
    pub old_friendly_name: String,
    pub new_friendly_name: Option<String>,
    pub max_age: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessKeyRemove {
    pub access_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppAdd {
    pub app_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppRemove {
    pub app_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppRename {
    pub current_app_name: String,
    pub new_app_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppTransfer {
    pub app_name: String,
    pub email: String,
}

/// Add or remove a collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollaboratorChange {
    pub app_name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollaboratorList {
    pub app_name: String,
    pub format: OutputFormat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentAdd {
    pub app_name: String,
    pub deployment_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentList {
    pub app_name: String,
    pub format: OutputFormat,
    /// Show deployment keys in text output
    pub display_keys: bool,
}

/// Deployment of an app, for remove and history clear
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentTarget {
    pub app_name: String,
    pub deployment_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRename {
    pub app_name: String,
    pub current_deployment_name: String,
    pub new_deployment_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentHistory {
    pub app_name: String,
    pub deployment_name: String,
    pub format: OutputFormat,
    /// Show the "Released By" column in text output
    pub display_author: bool,
}

/// Update metadata of an existing release
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Patch {
    pub app_name: String,
    pub deployment_name: String,
    /// Release to patch; the latest release when unset
    pub label: Option<String>,
    pub app_store_version: Option<String>,
    pub description: Option<String>,
    pub disabled: Option<bool>,
    pub mandatory: Option<bool>,
    pub rollout: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Promote {
    pub app_name: String,
    pub source_deployment_name: String,
    pub dest_deployment_name: String,
    pub app_store_version: Option<String>,
    pub description: Option<String>,
    pub disabled: Option<bool>,
    pub mandatory: Option<bool>,
    pub rollout: Option<u8>,
}

/// Release an already-built package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub app_name: String,
    pub deployment_name: String,
    pub package: PathBuf,
    /// Target binary version range
    pub app_store_version: String,
    pub description: Option<String>,
    pub disabled: bool,
    pub mandatory: bool,
    pub rollout: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseCordova {
    pub app_name: String,
    pub deployment_name: String,
    pub platform: String,
    /// Run `build` instead of `prepare`
    pub build: bool,
    /// Target binary version range; read from config.xml when unset
    pub app_store_version: Option<String>,
    pub description: Option<String>,
    pub disabled: bool,
    pub mandatory: bool,
    pub rollout: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseReact {
    pub app_name: String,
    pub deployment_name: String,
    pub platform: String,
    /// Target binary version range; read from package.json when unset
    pub app_store_version: Option<String>,
    pub bundle_name: Option<String>,
    pub entry_file: Option<String>,
    pub development: bool,
    pub sourcemap_output: Option<PathBuf>,
    /// Replaces the temporary "CodePush" output directory
    pub output_dir: Option<PathBuf>,
    pub description: Option<String>,
    pub disabled: bool,
    pub mandatory: bool,
    pub rollout: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rollback {
    pub app_name: String,
    pub deployment_name: String,
    /// Label to roll back to; the previous release when unset
    pub target_release: Option<String>,
}

/// Fully resolved release request handed to the upload operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseCommand {
    pub app_name: String,
    pub deployment_name: String,
    /// Directory or single non-archive file
    pub package: PathBuf,
    pub app_store_version: String,
    pub description: Option<String>,
    pub disabled: bool,
    pub mandatory: bool,
    pub rollout: Option<u8>,
}

impl From<Release> for ReleaseCommand {
    fn from(release: Release) -> Self {
        Self {
            app_name: release.app_name,
            deployment_name: release.deployment_name,
            package: release.package,
            app_store_version: release.app_store_version,
            description: release.description,
            disabled: release.disabled,
            mandatory: release.mandatory,
            rollout: release.rollout,
        }
    }
}
