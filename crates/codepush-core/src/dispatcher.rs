//! Command dispatcher
//!
//! Maps every [`Command`] variant to its handler. Handlers validate input,
//! confirm destructive operations, call the management service and log one
//! rendered result through the session's output sink.

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::command::*;
use crate::error::{Result, ValidationError};
use crate::output;
use crate::pipeline::{release_success_message, ReleasePipeline};
use crate::session::Session;
use crate::types::{attach_metrics, CollaboratorMap, PackageInfo};
use crate::validation;

const CONFIRM_PROMPT: &str = "Are you sure?";

/// Executes commands against a session
pub struct Dispatcher<'a> {
    session: &'a Session,
}

impl<'a> Dispatcher<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Execute a single command to completion
    #[instrument(skip_all, fields(command = command.name()))]
    pub async fn execute(&self, command: Command) -> Result<()> {
        info!("executing command");
        match command {
            Command::AccessKeyAdd(cmd) => self.access_key_add(cmd).await,
            Command::AccessKeyEdit(cmd) => self.access_key_edit(cmd).await,
            Command::AccessKeyList(cmd) => self.access_key_list(cmd).await,
            Command::AccessKeyRemove(cmd) => self.access_key_remove(cmd).await,
            Command::AppAdd(cmd) => self.app_add(cmd).await,
            Command::AppList(cmd) => self.app_list(cmd).await,
            Command::AppRemove(cmd) => self.app_remove(cmd).await,
            Command::AppRename(cmd) => self.app_rename(cmd).await,
            Command::AppTransfer(cmd) => self.app_transfer(cmd).await,
            Command::CollaboratorAdd(cmd) => self.collaborator_add(cmd).await,
            Command::CollaboratorList(cmd) => self.collaborator_list(cmd).await,
            Command::CollaboratorRemove(cmd) => self.collaborator_remove(cmd).await,
            Command::DeploymentAdd(cmd) => self.deployment_add(cmd).await,
            Command::DeploymentList(cmd) => self.deployment_list(cmd).await,
            Command::DeploymentRemove(cmd) => self.deployment_remove(cmd).await,
            Command::DeploymentRename(cmd) => self.deployment_rename(cmd).await,
            Command::DeploymentHistory(cmd) => self.deployment_history(cmd).await,
            Command::DeploymentHistoryClear(cmd) => self.deployment_history_clear(cmd).await,
            Command::Patch(cmd) => self.patch(cmd).await,
            Command::Promote(cmd) => self.promote(cmd).await,
            Command::Release(cmd) => {
                let released = ReleasePipeline::new(self.session).release(cmd).await?;
                self.log(release_success_message(&released));
                Ok(())
            }
            Command::ReleaseCordova(cmd) => {
                let released = ReleasePipeline::new(self.session)
                    .release_cordova(cmd)
                    .await?;
                self.log(release_success_message(&released));
                Ok(())
            }
            Command::ReleaseReact(cmd) => {
                let released = ReleasePipeline::new(self.session)
                    .release_react(cmd)
                    .await?;
                self.log(release_success_message(&released));
                Ok(())
            }
            Command::Rollback(cmd) => self.rollback(cmd).await,
            Command::Whoami => self.whoami().await,
        }
    }

    fn log(&self, message: impl AsRef<str>) {
        self.session.log(message);
    }

    fn render<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        self.log(output::to_json(value)?);
        Ok(())
    }

    async fn confirm(&self) -> Result<bool> {
        Ok(self.session.prompter.confirm(CONFIRM_PROMPT).await?)
    }

    // Access keys

    async fn access_key_add(&self, cmd: AccessKeyAdd) -> Result<()> {
        let key = self
            .session
            .sdk
            .add_access_key(&cmd.friendly_name, cmd.max_age)
            .await?;
        self.log(format!(
            "Successfully created a new access key \"{}\": {}\n(Expires: {})",
            cmd.friendly_name,
            key.name.as_deref().unwrap_or_default(),
            output::format_date(key.expires)
        ));
        Ok(())
    }

    async fn access_key_edit(&self, cmd: AccessKeyEdit) -> Result<()> {
        if cmd.new_friendly_name.is_none() && cmd.max_age.is_none() {
            return Err(ValidationError::EmptyAccessKeyEdit.into());
        }

        let key = self
            .session
            .sdk
            .edit_access_key(
                &cmd.old_friendly_name,
                cmd.new_friendly_name.as_deref(),
                cmd.max_age,
            )
            .await?;
        let expiry = output::format_date(key.expires);

        let message = match (&cmd.new_friendly_name, cmd.max_age) {
            (Some(new_name), Some(_)) => format!(
                "Successfully renamed the access key \"{}\" to \"{}\" and changed its expiry to {}.",
                cmd.old_friendly_name, new_name, expiry
            ),
            (Some(new_name), None) => format!(
                "Successfully renamed the access key \"{}\" to \"{}\".",
                cmd.old_friendly_name, new_name
            ),
            (None, _) => format!(
                "Successfully changed the access key \"{}\"'s expiry to {}.",
                cmd.old_friendly_name, expiry
            ),
        };
        self.log(message);
        Ok(())
    }

    async fn access_key_list(&self, cmd: ListOptions) -> Result<()> {
        let keys: Vec<_> = self
            .session
            .sdk
            .get_access_keys()
            .await?
            .into_iter()
            .filter(|key| key.is_session != Some(true))
            .map(|mut key| {
                key.name = None;
                key
            })
            .collect();

        match cmd.format {
            OutputFormat::Json => self.render(&keys),
            OutputFormat::Text => {
                let now = chrono::Utc::now().timestamp_millis();
                self.log(output::access_key_table(&keys, now));
                Ok(())
            }
        }
    }

    async fn access_key_remove(&self, cmd: AccessKeyRemove) -> Result<()> {
        if !self.confirm().await? {
            self.log("Access key removal cancelled.");
            return Ok(());
        }

        self.session.sdk.remove_access_key(&cmd.access_key).await?;
        self.log(format!(
            "Successfully removed the \"{}\" access key.",
            cmd.access_key
        ));
        Ok(())
    }

    // Apps

    async fn app_add(&self, cmd: AppAdd) -> Result<()> {
        let app = self.session.sdk.add_app(&cmd.app_name).await?;
        self.log(format!(
            "Successfully added the \"{}\" app, along with the following default deployments:",
            app.name
        ));

        let deployments = self.session.sdk.get_deployments(&app.name).await?;
        self.log(output::deployment_key_table(&deployments));
        Ok(())
    }

    async fn app_list(&self, cmd: ListOptions) -> Result<()> {
        let mut apps = self.session.sdk.get_apps().await?;
        for app in &mut apps {
            let deployments = self.session.sdk.get_deployments(&app.name).await?;
            app.deployments = Some(deployments.into_iter().map(|d| d.name).collect());
        }

        match cmd.format {
            OutputFormat::Json => self.render(&apps),
            OutputFormat::Text => {
                self.log(output::app_table(&apps));
                Ok(())
            }
        }
    }

    async fn app_remove(&self, cmd: AppRemove) -> Result<()> {
        if !self.confirm().await? {
            self.log("App removal cancelled.");
            return Ok(());
        }

        self.session.sdk.remove_app(&cmd.app_name).await?;
        self.log(format!("Successfully removed the \"{}\" app.", cmd.app_name));
        Ok(())
    }

    async fn app_rename(&self, cmd: AppRename) -> Result<()> {
        self.session
            .sdk
            .rename_app(&cmd.current_app_name, &cmd.new_app_name)
            .await?;
        self.log(format!(
            "Successfully renamed the \"{}\" app to \"{}\".",
            cmd.current_app_name, cmd.new_app_name
        ));
        Ok(())
    }

    async fn app_transfer(&self, cmd: AppTransfer) -> Result<()> {
        self.session
            .sdk
            .transfer_app(&cmd.app_name, &cmd.email)
            .await?;
        self.log(format!(
            "Successfully transferred the ownership of app \"{}\" to the account with email \"{}\".",
            cmd.app_name, cmd.email
        ));
        Ok(())
    }

    // Collaborators

    async fn collaborator_add(&self, cmd: CollaboratorChange) -> Result<()> {
        self.session
            .sdk
            .add_collaborator(&cmd.app_name, &cmd.email)
            .await?;
        self.log(format!(
            "Successfully added \"{}\" as a collaborator to the app \"{}\".",
            cmd.email, cmd.app_name
        ));
        Ok(())
    }

    async fn collaborator_list(&self, cmd: CollaboratorList) -> Result<()> {
        #[derive(Serialize)]
        struct Listing<'c> {
            collaborators: &'c CollaboratorMap,
        }

        let collaborators = self.session.sdk.get_collaborators(&cmd.app_name).await?;
        match cmd.format {
            OutputFormat::Json => self.render(&Listing {
                collaborators: &collaborators,
            }),
            OutputFormat::Text => {
                self.log(output::collaborator_table(&collaborators));
                Ok(())
            }
        }
    }

    async fn collaborator_remove(&self, cmd: CollaboratorChange) -> Result<()> {
        self.session
            .sdk
            .remove_collaborator(&cmd.app_name, &cmd.email)
            .await?;
        self.log(format!(
            "Successfully removed \"{}\" as a collaborator from the app \"{}\".",
            cmd.email, cmd.app_name
        ));
        Ok(())
    }

    // Deployments

    async fn deployment_add(&self, cmd: DeploymentAdd) -> Result<()> {
        let deployment = self
            .session
            .sdk
            .add_deployment(&cmd.app_name, &cmd.deployment_name)
            .await?;
        self.log(format!(
            "Successfully added the \"{}\" deployment with key \"{}\" to the \"{}\" app.",
            cmd.deployment_name,
            deployment.key.as_deref().unwrap_or_default(),
            cmd.app_name
        ));
        Ok(())
    }

    async fn deployment_list(&self, cmd: DeploymentList) -> Result<()> {
        let mut deployments = self.session.sdk.get_deployments(&cmd.app_name).await?;
        for deployment in &mut deployments {
            let Some(package) = deployment.package.as_mut() else {
                continue;
            };
            let metrics = self
                .session
                .sdk
                .get_deployment_metrics(&cmd.app_name, &deployment.name)
                .await?;
            attach_metrics(package, &metrics);
        }

        match cmd.format {
            OutputFormat::Json => self.render(&deployments),
            OutputFormat::Text => {
                self.log(output::deployment_table(&deployments, cmd.display_keys));
                Ok(())
            }
        }
    }

    async fn deployment_remove(&self, cmd: DeploymentTarget) -> Result<()> {
        if !self.confirm().await? {
            self.log("Deployment removal cancelled.");
            return Ok(());
        }

        self.session
            .sdk
            .remove_deployment(&cmd.app_name, &cmd.deployment_name)
            .await?;
        self.log(format!(
            "Successfully removed the \"{}\" deployment from the \"{}\" app.",
            cmd.deployment_name, cmd.app_name
        ));
        Ok(())
    }

    async fn deployment_rename(&self, cmd: DeploymentRename) -> Result<()> {
        self.session
            .sdk
            .rename_deployment(
                &cmd.app_name,
                &cmd.current_deployment_name,
                &cmd.new_deployment_name,
            )
            .await?;
        self.log(format!(
            "Successfully renamed the \"{}\" deployment to \"{}\" for the \"{}\" app.",
            cmd.current_deployment_name, cmd.new_deployment_name, cmd.app_name
        ));
        Ok(())
    }

    async fn deployment_history(&self, cmd: DeploymentHistory) -> Result<()> {
        let mut history = self
            .session
            .sdk
            .get_deployment_history(&cmd.app_name, &cmd.deployment_name)
            .await?;
        let metrics = self
            .session
            .sdk
            .get_deployment_metrics(&cmd.app_name, &cmd.deployment_name)
            .await?;
        for package in &mut history {
            attach_metrics(package, &metrics);
        }
        debug!(releases = history.len(), "history loaded");

        match cmd.format {
            OutputFormat::Json => self.render(&history),
            OutputFormat::Text => {
                self.log(output::history_table(&history, cmd.display_author));
                Ok(())
            }
        }
    }

    async fn deployment_history_clear(&self, cmd: DeploymentTarget) -> Result<()> {
        if !self.confirm().await? {
            self.log("Clear deployment cancelled.");
            return Ok(());
        }

        self.session
            .sdk
            .clear_deployment_history(&cmd.app_name, &cmd.deployment_name)
            .await?;
        self.log(format!(
            "Successfully cleared the release history associated with the \"{}\" deployment from the \"{}\" app.",
            cmd.deployment_name, cmd.app_name
        ));
        Ok(())
    }

    // Release management

    async fn patch(&self, cmd: Patch) -> Result<()> {
        let info = PackageInfo {
            app_version: cmd.app_store_version,
            description: cmd.description,
            is_mandatory: cmd.mandatory,
            is_disabled: cmd.disabled,
            rollout: cmd.rollout,
            label: None,
        };
        if info.is_empty() {
            return Err(ValidationError::EmptyPatch.into());
        }
        validate_package_info(&info)?;

        self.session
            .sdk
            .patch_release(
                &cmd.app_name,
                &cmd.deployment_name,
                cmd.label.as_deref(),
                &info,
            )
            .await?;
        self.log(format!(
            "Successfully updated the \"{}\" release of \"{}\" app's \"{}\" deployment.",
            cmd.label.as_deref().unwrap_or("latest"),
            cmd.app_name,
            cmd.deployment_name
        ));
        Ok(())
    }

    async fn promote(&self, cmd: Promote) -> Result<()> {
        let info = PackageInfo {
            app_version: cmd.app_store_version,
            description: cmd.description,
            is_mandatory: cmd.mandatory,
            is_disabled: cmd.disabled,
            rollout: cmd.rollout,
            label: None,
        };
        validate_package_info(&info)?;

        self.session
            .sdk
            .promote(
                &cmd.app_name,
                &cmd.source_deployment_name,
                &cmd.dest_deployment_name,
                &info,
            )
            .await?;
        self.log(format!(
            "Successfully promoted the \"{}\" deployment of the \"{}\" app to the \"{}\" deployment.",
            cmd.source_deployment_name, cmd.app_name, cmd.dest_deployment_name
        ));
        Ok(())
    }

    async fn rollback(&self, cmd: Rollback) -> Result<()> {
        self.session
            .sdk
            .rollback(
                &cmd.app_name,
                &cmd.deployment_name,
                cmd.target_release.as_deref(),
            )
            .await?;
        self.log(format!(
            "Successfully performed a rollback on the \"{}\" deployment of the \"{}\" app.",
            cmd.deployment_name, cmd.app_name
        ));
        Ok(())
    }

    async fn whoami(&self) -> Result<()> {
        let account = self.session.sdk.get_account_info().await?;
        self.log(account.email);
        Ok(())
    }
}

fn validate_package_info(info: &PackageInfo) -> std::result::Result<(), ValidationError> {
    if let Some(range) = &info.app_version {
        validation::validate_semver_range(range)?;
    }
    validation::validate_rollout(info.rollout)
}
