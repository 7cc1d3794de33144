//! HTTP client for the CodePush management service
//!
//! Every request carries the access key as a bearer token. Responses wrap
//! their payload in a single-key envelope (`{"apps": [...]}`), which is
//! unwrapped here so callers only see the core types.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use codepush_core::types::{
    AccessKey, Account, App, CollaboratorMap, Deployment, DeploymentMetrics, Package, PackageInfo,
};
use codepush_core::{ManagementSdk, ReleaseCommand, SdkResult};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, instrument};
use url::Url;

use crate::error::{Result, SdkError};
use crate::packaging::package_release;

const USER_AGENT: &str = concat!("code-push-cli/", env!("CARGO_PKG_VERSION"));

#[derive(Deserialize)]
struct AccountEnvelope {
    account: Account,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccessKeysEnvelope {
    access_keys: Vec<AccessKey>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccessKeyEnvelope {
    access_key: AccessKey,
}

#[derive(Deserialize)]
struct AppsEnvelope {
    apps: Vec<App>,
}

#[derive(Deserialize)]
struct AppEnvelope {
    app: App,
}

#[derive(Deserialize)]
struct CollaboratorsEnvelope {
    collaborators: CollaboratorMap,
}

#[derive(Deserialize)]
struct DeploymentsEnvelope {
    deployments: Vec<Deployment>,
}

#[derive(Deserialize)]
struct DeploymentEnvelope {
    deployment: Deployment,
}

#[derive(Deserialize)]
struct HistoryEnvelope {
    history: Vec<Package>,
}

#[derive(Deserialize)]
struct MetricsEnvelope {
    metrics: DeploymentMetrics,
}

#[derive(Deserialize)]
struct PackageEnvelope {
    package: Package,
}

/// Body for access key creation and edits
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct AccessKeyRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    friendly_name: Option<&'a str>,
    /// Time to live in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    ttl: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_by: Option<String>,
}

/// Management service client
#[derive(Clone)]
pub struct HttpSdk {
    client: Client,
    base_url: Url,
    access_key: String,
}

impl std::fmt::Debug for HttpSdk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSdk")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl HttpSdk {
    /// Create a client for `server_url`, optionally routed through `proxy`
    pub fn new(server_url: &str, access_key: impl Into<String>, proxy: Option<&str>) -> Result<Self> {
        let base_url =
            Url::parse(server_url).map_err(|e| SdkError::InvalidUrl(format!("{server_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(SdkError::InvalidUrl(server_url.to_string()));
        }

        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(proxy) = proxy {
            debug!(proxy, "routing requests through proxy");
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
            access_key: access_key.into(),
        })
    }

    /// Server URL this client talks to
    pub fn server_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL, percent-encoding each path segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SdkError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<serde_json::Value>,
    ) -> Result<Response> {
        let url = self.endpoint(segments)?;
        debug!("CodePush API request: {} {}", method, url);

        let mut request = self
            .client
            .request(method, url)
            .header("Authorization", format!("Bearer {}", self.access_key))
            .header("Accept", "application/json");

        if let Some(body) = body {
            request = request.json(&body);
        }

        check_status(request.send().await?).await
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let response = self.send(Method::GET, segments, None).await?;
        Ok(response.json().await?)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: serde_json::Value,
    ) -> Result<T> {
        let response = self.send(method, segments, Some(body)).await?;
        Ok(response.json().await?)
    }

    async fn send_empty(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<serde_json::Value>,
    ) -> Result<()> {
        self.send(method, segments, body).await?;
        Ok(())
    }

    async fn upload(&self, command: &ReleaseCommand) -> Result<Package> {
        let archive = package_release(&command.package)?;
        let content = tokio::fs::read(archive.path()).await?;
        info!(
            package = %command.package.display(),
            bytes = content.len(),
            "uploading release"
        );

        let info = PackageInfo {
            app_version: Some(command.app_store_version.clone()),
            description: command.description.clone(),
            is_mandatory: Some(command.mandatory),
            is_disabled: Some(command.disabled),
            rollout: command.rollout,
            label: None,
        };

        let form = Form::new()
            .part(
                "package",
                Part::bytes(content)
                    .file_name(archive_file_name(&command.package))
                    .mime_str("application/zip")?,
            )
            .text("packageInfo", serde_json::to_string(&info)?);

        let url = self.endpoint(&[
            "apps",
            &command.app_name,
            "deployments",
            &command.deployment_name,
            "release",
        ])?;
        debug!("CodePush API request: POST {}", url);

        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.access_key))
            .header("Accept", "application/json")
            .multipart(form)
            .send()
            .await?;

        let envelope: PackageEnvelope = check_status(response).await?.json().await?;
        Ok(envelope.package)
    }
}

/// Turn a non-success response into [`SdkError::ApiError`]
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response.text().await.unwrap_or_default();
    let message = if error_text.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string()
    } else {
        error_text
    };
    Err(SdkError::ApiError {
        status: status.as_u16(),
        message,
    })
}

fn archive_file_name(package: &Path) -> String {
    let stem = package
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "package".to_string());
    format!("{stem}.zip")
}

fn ttl_millis(max_age: Option<Duration>) -> Option<u64> {
    max_age.map(|age| u64::try_from(age.as_millis()).unwrap_or(u64::MAX))
}

fn local_hostname() -> String {
    hostname::get()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "Unknown".to_string())
}

#[async_trait]
impl ManagementSdk for HttpSdk {
    async fn get_account_info(&self) -> SdkResult<Account> {
        let envelope: AccountEnvelope = self.get(&["account"]).await?;
        Ok(envelope.account)
    }

    async fn get_access_keys(&self) -> SdkResult<Vec<AccessKey>> {
        let envelope: AccessKeysEnvelope = self.get(&["accessKeys"]).await?;
        Ok(envelope.access_keys)
    }

    #[instrument(skip(self))]
    async fn add_access_key(
        &self,
        friendly_name: &str,
        max_age: Option<Duration>,
    ) -> SdkResult<AccessKey> {
        let body = AccessKeyRequest {
            friendly_name: Some(friendly_name),
            ttl: ttl_millis(max_age),
            created_by: Some(local_hostname()),
        };
        let envelope: AccessKeyEnvelope = self
            .send_json(Method::POST, &["accessKeys"], serde_json::to_value(body).map_err(SdkError::from)?)
            .await?;
        Ok(envelope.access_key)
    }

    #[instrument(skip(self))]
    async fn edit_access_key(
        &self,
        old_friendly_name: &str,
        new_friendly_name: Option<&str>,
        max_age: Option<Duration>,
    ) -> SdkResult<AccessKey> {
        let body = AccessKeyRequest {
            friendly_name: new_friendly_name,
            ttl: ttl_millis(max_age),
            created_by: None,
        };
        let envelope: AccessKeyEnvelope = self
            .send_json(
                Method::PATCH,
                &["accessKeys", old_friendly_name],
                serde_json::to_value(body).map_err(SdkError::from)?,
            )
            .await?;
        Ok(envelope.access_key)
    }

    async fn remove_access_key(&self, name: &str) -> SdkResult<()> {
        Ok(self
            .send_empty(Method::DELETE, &["accessKeys", name], None)
            .await?)
    }

    async fn get_apps(&self) -> SdkResult<Vec<App>> {
        let envelope: AppsEnvelope = self.get(&["apps"]).await?;
        Ok(envelope.apps)
    }

    async fn add_app(&self, app_name: &str) -> SdkResult<App> {
        let envelope: AppEnvelope = self
            .send_json(Method::POST, &["apps"], json!({ "name": app_name }))
            .await?;
        Ok(envelope.app)
    }

    async fn remove_app(&self, app_name: &str) -> SdkResult<()> {
        Ok(self
            .send_empty(Method::DELETE, &["apps", app_name], None)
            .await?)
    }

    async fn rename_app(&self, old_app_name: &str, new_app_name: &str) -> SdkResult<()> {
        Ok(self
            .send_empty(
                Method::PATCH,
                &["apps", old_app_name],
                Some(json!({ "name": new_app_name })),
            )
            .await?)
    }

    async fn transfer_app(&self, app_name: &str, email: &str) -> SdkResult<()> {
        Ok(self
            .send_empty(Method::POST, &["apps", app_name, "transfer", email], None)
            .await?)
    }

    async fn get_collaborators(&self, app_name: &str) -> SdkResult<CollaboratorMap> {
        let envelope: CollaboratorsEnvelope =
            self.get(&["apps", app_name, "collaborators"]).await?;
        Ok(envelope.collaborators)
    }

    async fn add_collaborator(&self, app_name: &str, email: &str) -> SdkResult<()> {
        Ok(self
            .send_empty(
                Method::POST,
                &["apps", app_name, "collaborators", email],
                None,
            )
            .await?)
    }

    async fn remove_collaborator(&self, app_name: &str, email: &str) -> SdkResult<()> {
        Ok(self
            .send_empty(
                Method::DELETE,
                &["apps", app_name, "collaborators", email],
                None,
            )
            .await?)
    }

    async fn get_deployments(&self, app_name: &str) -> SdkResult<Vec<Deployment>> {
        let envelope: DeploymentsEnvelope = self.get(&["apps", app_name, "deployments"]).await?;
        Ok(envelope.deployments)
    }

    async fn add_deployment(
        &self,
        app_name: &str,
        deployment_name: &str,
    ) -> SdkResult<Deployment> {
        let envelope: DeploymentEnvelope = self
            .send_json(
                Method::POST,
                &["apps", app_name, "deployments"],
                json!({ "name": deployment_name }),
            )
            .await?;
        Ok(envelope.deployment)
    }

    async fn remove_deployment(&self, app_name: &str, deployment_name: &str) -> SdkResult<()> {
        Ok(self
            .send_empty(
                Method::DELETE,
                &["apps", app_name, "deployments", deployment_name],
                None,
            )
            .await?)
    }

    async fn rename_deployment(
        &self,
        app_name: &str,
        old_deployment_name: &str,
        new_deployment_name: &str,
    ) -> SdkResult<()> {
        Ok(self
            .send_empty(
                Method::PATCH,
                &["apps", app_name, "deployments", old_deployment_name],
                Some(json!({ "name": new_deployment_name })),
            )
            .await?)
    }

    async fn get_deployment_history(
        &self,
        app_name: &str,
        deployment_name: &str,
    ) -> SdkResult<Vec<Package>> {
        let envelope: HistoryEnvelope = self
            .get(&["apps", app_name, "deployments", deployment_name, "history"])
            .await?;
        Ok(envelope.history)
    }

    async fn clear_deployment_history(
        &self,
        app_name: &str,
        deployment_name: &str,
    ) -> SdkResult<()> {
        Ok(self
            .send_empty(
                Method::DELETE,
                &["apps", app_name, "deployments", deployment_name, "history"],
                None,
            )
            .await?)
    }

    async fn get_deployment_metrics(
        &self,
        app_name: &str,
        deployment_name: &str,
    ) -> SdkResult<DeploymentMetrics> {
        let envelope: MetricsEnvelope = self
            .get(&["apps", app_name, "deployments", deployment_name, "metrics"])
            .await?;
        Ok(envelope.metrics)
    }

    #[instrument(skip_all, fields(app = %command.app_name, deployment = %command.deployment_name))]
    async fn release(&self, command: &ReleaseCommand) -> SdkResult<String> {
        let package = self.upload(command).await?;
        let label = package.label().unwrap_or("unlabelled").to_string();
        info!(%label, "release created");
        Ok(label)
    }

    async fn patch_release(
        &self,
        app_name: &str,
        deployment_name: &str,
        label: Option<&str>,
        info: &PackageInfo,
    ) -> SdkResult<()> {
        let mut info = info.clone();
        info.label = label.map(str::to_string);
        Ok(self
            .send_empty(
                Method::PATCH,
                &["apps", app_name, "deployments", deployment_name, "release"],
                Some(json!({ "packageInfo": info })),
            )
            .await?)
    }

    async fn promote(
        &self,
        app_name: &str,
        source_deployment_name: &str,
        dest_deployment_name: &str,
        info: &PackageInfo,
    ) -> SdkResult<()> {
        Ok(self
            .send_empty(
                Method::POST,
                &[
                    "apps",
                    app_name,
                    "deployments",
                    source_deployment_name,
                    "promote",
                    dest_deployment_name,
                ],
                Some(json!({ "packageInfo": info })),
            )
            .await?)
    }

    async fn rollback(
        &self,
        app_name: &str,
        deployment_name: &str,
        target_release: Option<&str>,
    ) -> SdkResult<()> {
        let mut segments = vec!["apps", app_name, "deployments", deployment_name, "rollback"];
        segments.extend(target_release);
        Ok(self.send_empty(Method::POST, &segments, None).await?)
    }
}
