//! Entities exchanged with the CodePush management service
//!
//! Field order of each struct is the order fields are rendered in JSON output.
//! Packages are the exception and keep the order the service sent.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The account the current session is authenticated as
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_providers: Option<Vec<String>>,
}

/// An access key (or session) belonging to the account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessKey {
    /// The secret key, only returned on creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub created_time: i64,
    pub created_by: String,
    pub friendly_name: String,
    /// Expiry as milliseconds since the Unix epoch
    pub expires: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_session: Option<bool>,
}

/// Permission record of one collaborator on an app
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollaboratorProperties {
    pub permission: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_current_account: Option<bool>,
}

impl CollaboratorProperties {
    pub fn is_owner(&self) -> bool {
        self.permission == "Owner"
    }

    pub fn is_current_account(&self) -> bool {
        self.is_current_account.unwrap_or(false)
    }
}

/// Collaborators of an app keyed by email, in server order
pub type CollaboratorMap = IndexMap<String, CollaboratorProperties>;

/// An app registered with the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct App {
    pub name: String,
    #[serde(default)]
    pub collaborators: CollaboratorMap,
    /// Deployment names, attached by the app list command
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployments: Option<Vec<String>>,
}

/// A deployment of an app and its latest release, if any
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<Package>,
}

/// Release metadata as stored by the service
///
/// Kept as the raw object the service returned so JSON output carries every
/// field in server order, including ones this client does not know about.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Package(Map<String, Value>);

impl Package {
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn label(&self) -> Option<&str> {
        self.str_field("label")
    }

    /// Target binary version range
    pub fn app_version(&self) -> &str {
        self.str_field("appVersion").unwrap_or_default()
    }

    pub fn description(&self) -> Option<&str> {
        self.str_field("description")
    }

    pub fn is_mandatory(&self) -> bool {
        self.0.get("isMandatory").and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn is_disabled(&self) -> bool {
        self.0.get("isDisabled").and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn rollout(&self) -> Option<u64> {
        self.0.get("rollout").and_then(Value::as_u64)
    }

    /// Milliseconds since the Unix epoch
    pub fn upload_time(&self) -> Option<i64> {
        self.0.get("uploadTime").and_then(Value::as_i64)
    }

    pub fn release_method(&self) -> Option<&str> {
        self.str_field("releaseMethod")
    }

    pub fn original_label(&self) -> Option<&str> {
        self.str_field("originalLabel")
    }

    pub fn original_deployment(&self) -> Option<&str> {
        self.str_field("originalDeployment")
    }

    pub fn released_by(&self) -> Option<&str> {
        self.str_field("releasedBy")
    }

    /// Install metrics, attached for list-type output only
    pub fn metrics(&self) -> Option<PackageMetrics> {
        self.0
            .get("metrics")
            .and_then(|value| PackageMetrics::deserialize(value).ok())
    }

    /// Replace any metrics and append them as the last field
    pub fn set_metrics(&mut self, metrics: &PackageMetrics) {
        self.0.shift_remove("metrics");
        self.0.insert("metrics".to_string(), metrics.to_value());
    }
}

/// Updatable release metadata for patch, promote and release requests.
///
/// Only fields that were explicitly provided are serialized, so unset fields
/// never overwrite existing remote values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_mandatory: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_disabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rollout: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl PackageInfo {
    /// True when no updatable field was provided
    pub fn is_empty(&self) -> bool {
        self.app_version.is_none()
            && self.description.is_none()
            && self.is_mandatory.is_none()
            && self.is_disabled.is_none()
            && self.rollout.is_none()
    }
}

/// Install counters reported for one label or app version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMetrics {
    #[serde(default)]
    pub active: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloaded: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installed: Option<u64>,
}

/// Metrics of a deployment keyed by label (or binary app version)
pub type DeploymentMetrics = IndexMap<String, UpdateMetrics>;

/// Metrics attached to a displayed package
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageMetrics {
    pub active: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloaded: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installed: Option<u64>,
    /// Sum of `active` across every label of the deployment
    pub total_active: u64,
}

impl PackageMetrics {
    pub fn new(metrics: &UpdateMetrics, total_active: u64) -> Self {
        Self {
            active: metrics.active,
            downloaded: metrics.downloaded,
            failed: metrics.failed,
            installed: metrics.installed,
            total_active,
        }
    }

    /// Object form with `totalActive` last and unset counters omitted
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("active".to_string(), self.active.into());
        let counters = [
            ("downloaded", self.downloaded),
            ("failed", self.failed),
            ("installed", self.installed),
        ];
        for (key, count) in counters {
            if let Some(count) = count {
                map.insert(key.to_string(), count.into());
            }
        }
        map.insert("totalActive".to_string(), self.total_active.into());
        Value::Object(map)
    }

    /// Downloads that have neither installed nor failed yet
    pub fn pending(&self) -> u64 {
        let downloaded = self.downloaded.unwrap_or(0);
        let settled = self.installed.unwrap_or(0) + self.failed.unwrap_or(0);
        downloaded.saturating_sub(settled)
    }
}

/// Sum of active installs across all labels of a deployment
pub fn total_active(metrics: &DeploymentMetrics) -> u64 {
    metrics.values().map(|m| m.active).sum()
}

/// Attach metrics to a package when its label has an entry
pub fn attach_metrics(package: &mut Package, metrics: &DeploymentMetrics) {
    let entry = package.label().and_then(|label| metrics.get(label));
    if let Some(entry) = entry {
        package.set_metrics(&PackageMetrics::new(entry, total_active(metrics)));
    }
}
