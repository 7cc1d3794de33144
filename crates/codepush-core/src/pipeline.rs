//! Release pipeline
//!
//! Drives a release through `Validating → Resolving → Bundling → Uploading`.
//! Any failure is terminal: the remote release operation is only reached once
//! every earlier stage has succeeded, and it is called exactly once.

use std::fmt;
use std::fs;
use std::path::Path;

use tracing::{debug, info, instrument, warn};

use crate::bundler::{self, BundleRequest};
use crate::command::{Release, ReleaseCommand, ReleaseCordova, ReleaseReact};
use crate::conventions::{self, CordovaPlatform, ReactPlatform, REACT_OUTPUT_DIR_NAME};
use crate::error::{Result, ValidationError};
use crate::session::Session;
use crate::validation;

/// Stage of a release in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseStage {
    Validating,
    Resolving,
    Bundling,
    Uploading,
    Done,
    Failed,
}

impl fmt::Display for ReleaseStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::Resolving => "resolving",
            Self::Bundling => "bundling",
            Self::Uploading => "uploading",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Runs one release-producing command against a session
pub struct ReleasePipeline<'a> {
    session: &'a Session,
    stage: ReleaseStage,
}

impl<'a> ReleasePipeline<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self {
            session,
            stage: ReleaseStage::Validating,
        }
    }

    pub fn stage(&self) -> ReleaseStage {
        self.stage
    }

    fn enter(&mut self, stage: ReleaseStage) {
        debug!(from = %self.stage, to = %stage, "release stage transition");
        self.stage = stage;
    }

    /// Record the outcome of the pipeline, moving to `Done` or `Failed`
    fn finish<T>(&mut self, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => self.enter(ReleaseStage::Done),
            Err(e) => {
                warn!(stage = %self.stage, error = %e, "release failed");
                self.enter(ReleaseStage::Failed);
            }
        }
        result
    }

    /// Release an already-built package directory or file
    #[instrument(skip_all, fields(app = %command.app_name, deployment = %command.deployment_name))]
    pub async fn release(&mut self, command: Release) -> Result<ReleaseCommand> {
        let result = self.run_release(command).await;
        self.finish(result)
    }

    async fn run_release(&mut self, command: Release) -> Result<ReleaseCommand> {
        self.enter(ReleaseStage::Validating);
        validation::validate_semver_range(&command.app_store_version)?;
        validation::validate_release_package(&command.package)?;
        validation::validate_rollout(command.rollout)?;

        let package = if command.package.is_absolute() {
            command.package.clone()
        } else {
            self.session.cwd.join(&command.package)
        };
        if !package.exists() {
            return Err(ValidationError::PackageNotFound(command.package).into());
        }

        self.upload(ReleaseCommand {
            package,
            ..ReleaseCommand::from(command)
        })
        .await
    }

    /// Prepare (or build) a Cordova project and release its web content
    #[instrument(skip_all, fields(app = %command.app_name, platform = %command.platform))]
    pub async fn release_cordova(&mut self, command: ReleaseCordova) -> Result<ReleaseCommand> {
        let result = self.run_release_cordova(command).await;
        self.finish(result)
    }

    async fn run_release_cordova(&mut self, command: ReleaseCordova) -> Result<ReleaseCommand> {
        let cwd = self.session.cwd.clone();

        self.enter(ReleaseStage::Validating);
        validate_optional_range(command.app_store_version.as_deref())?;
        validation::validate_rollout(command.rollout)?;

        self.enter(ReleaseStage::Resolving);
        let platform = CordovaPlatform::parse(&command.platform)?;
        let manifest_version = conventions::read_cordova_version(&cwd)?;
        let app_store_version = match command.app_store_version {
            Some(range) => range,
            None => {
                validation::validate_semver_range(&manifest_version)?;
                manifest_version
            }
        };

        self.enter(ReleaseStage::Bundling);
        let runner = self.session.process.as_ref();
        let cli = bundler::resolve_cordova_cli(runner)?;
        bundler::run_cordova_step(runner, &cwd, cli, platform, command.build)?;
        let package = platform.package_dir(&cwd);

        self.upload(ReleaseCommand {
            app_name: command.app_name,
            deployment_name: command.deployment_name,
            package,
            app_store_version,
            description: command.description,
            disabled: command.disabled,
            mandatory: command.mandatory,
            rollout: command.rollout,
        })
        .await
    }

    /// Bundle a React Native project and release the bundle directory
    #[instrument(skip_all, fields(app = %command.app_name, platform = %command.platform))]
    pub async fn release_react(&mut self, command: ReleaseReact) -> Result<ReleaseCommand> {
        let result = self.run_release_react(command).await;
        self.finish(result)
    }

    async fn run_release_react(&mut self, command: ReleaseReact) -> Result<ReleaseCommand> {
        let cwd = self.session.cwd.clone();

        self.enter(ReleaseStage::Validating);
        validate_optional_range(command.app_store_version.as_deref())?;
        validation::validate_rollout(command.rollout)?;

        self.enter(ReleaseStage::Resolving);
        let platform = ReactPlatform::parse(&command.platform)?;
        let app_store_version = match command.app_store_version {
            Some(range) => {
                conventions::ensure_react_project(&cwd)?;
                range
            }
            None => {
                let version = conventions::read_react_version(&cwd)?;
                validation::validate_semver_range(&version)?;
                version
            }
        };
        let entry_file =
            conventions::resolve_entry_file(&cwd, platform, command.entry_file.as_deref())?;
        let bundle_name = command
            .bundle_name
            .unwrap_or_else(|| platform.default_bundle_name());
        let output_dir = command
            .output_dir
            .unwrap_or_else(|| self.session.temp_dir.join(REACT_OUTPUT_DIR_NAME));

        self.enter(ReleaseStage::Bundling);
        prepare_output_dir(&output_dir)?;
        let request = BundleRequest {
            platform,
            entry_file,
            bundle_name,
            output_dir: output_dir.clone(),
            development: command.development,
            sourcemap_output: command.sourcemap_output,
        };
        bundler::run_react_bundler(
            self.session.process.as_ref(),
            &cwd,
            &request,
            self.session.bundler_timeout,
        )
        .await?;

        self.upload(ReleaseCommand {
            app_name: command.app_name,
            deployment_name: command.deployment_name,
            package: output_dir,
            app_store_version,
            description: command.description,
            disabled: command.disabled,
            mandatory: command.mandatory,
            rollout: command.rollout,
        })
        .await
    }

    async fn upload(&mut self, command: ReleaseCommand) -> Result<ReleaseCommand> {
        self.enter(ReleaseStage::Uploading);
        info!(
            package = %command.package.display(),
            target = %command.app_store_version,
            "uploading release"
        );
        let confirmation = self.session.sdk.release(&command).await?;
        debug!(%confirmation, "release accepted");
        Ok(command)
    }
}

fn validate_optional_range(range: Option<&str>) -> std::result::Result<(), ValidationError> {
    match range {
        Some(range) => validation::validate_semver_range(range),
        None => Ok(()),
    }
}

/// Start every bundle from an empty output directory
fn prepare_output_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir)?;
    }
    fs::create_dir_all(dir)?;
    Ok(())
}

/// Success message for a completed release
pub fn release_success_message(command: &ReleaseCommand) -> String {
    let kind = if command.package.is_dir() {
        "directory"
    } else {
        "file"
    };
    format!(
        "Successfully released an update containing the \"{}\" {} to the \"{}\" deployment of the \"{}\" app.",
        command.package.display(),
        kind,
        command.deployment_name,
        command.app_name
    )
}
