//! Remote management service operations
//!
//! The core only defines what it asks of the service; the HTTP client lives
//! in the `codepush-sdk` crate.

use std::time::Duration;

use async_trait::async_trait;

use crate::command::ReleaseCommand;
use crate::error::RemoteError;
use crate::types::{
    AccessKey, Account, App, CollaboratorMap, Deployment, DeploymentMetrics, Package, PackageInfo,
};

pub type SdkResult<T> = std::result::Result<T, RemoteError>;

/// Operations offered by the CodePush management service
#[async_trait]
pub trait ManagementSdk: Send + Sync {
    async fn get_account_info(&self) -> SdkResult<Account>;

    // Access keys
    async fn get_access_keys(&self) -> SdkResult<Vec<AccessKey>>;
    async fn add_access_key(
        &self,
        friendly_name: &str,
        max_age: Option<Duration>,
    ) -> SdkResult<AccessKey>;
    async fn edit_access_key(
        &self,
        old_friendly_name: &str,
        new_friendly_name: Option<&str>,
        max_age: Option<Duration>,
    ) -> SdkResult<AccessKey>;
    async fn remove_access_key(&self, name: &str) -> SdkResult<()>;

    // Apps
    async fn get_apps(&self) -> SdkResult<Vec<App>>;
    async fn add_app(&self, app_name: &str) -> SdkResult<App>;
    async fn remove_app(&self, app_name: &str) -> SdkResult<()>;
    async fn rename_app(&self, old_app_name: &str, new_app_name: &str) -> SdkResult<()>;
    async fn transfer_app(&self, app_name: &str, email: &str) -> SdkResult<()>;

    // Collaborators
    async fn get_collaborators(&self, app_name: &str) -> SdkResult<CollaboratorMap>;
    async fn add_collaborator(&self, app_name: &str, email: &str) -> SdkResult<()>;
    async fn remove_collaborator(&self, app_name: &str, email: &str) -> SdkResult<()>;

    // Deployments
    async fn get_deployments(&self, app_name: &str) -> SdkResult<Vec<Deployment>>;
    async fn add_deployment(&self, app_name: &str, deployment_name: &str)
        -> SdkResult<Deployment>;
    async fn remove_deployment(&self, app_name: &str, deployment_name: &str) -> SdkResult<()>;
    async fn rename_deployment(
        &self,
        app_name: &str,
        old_deployment_name: &str,
        new_deployment_name: &str,
    ) -> SdkResult<()>;
    async fn get_deployment_history(
        &self,
        app_name: &str,
        deployment_name: &str,
    ) -> SdkResult<Vec<Package>>;
    async fn clear_deployment_history(
        &self,
        app_name: &str,
        deployment_name: &str,
    ) -> SdkResult<()>;
    async fn get_deployment_metrics(
        &self,
        app_name: &str,
        deployment_name: &str,
    ) -> SdkResult<DeploymentMetrics>;

    // Releases
    /// Upload a release, returning the service's confirmation
    async fn release(&self, command: &ReleaseCommand) -> SdkResult<String>;
    async fn patch_release(
        &self,
        app_name: &str,
        deployment_name: &str,
        label: Option<&str>,
        info: &PackageInfo,
    ) -> SdkResult<()>;
    async fn promote(
        &self,
        app_name: &str,
        source_deployment_name: &str,
        dest_deployment_name: &str,
        info: &PackageInfo,
    ) -> SdkResult<()>;
    async fn rollback(
        &self,
        app_name: &str,
        deployment_name: &str,
        target_release: Option<&str>,
    ) -> SdkResult<()>;
}
