//! Recording substitutes for session collaborators, used by unit tests

use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::command::ReleaseCommand;
use crate::error::RemoteError;
use crate::process::{Invocation, ProcessOutput, ProcessRunner};
use crate::sdk::{ManagementSdk, SdkResult};
use crate::session::{OutputSink, Prompter, Session};
use crate::types::{
    AccessKey, Account, App, CollaboratorMap, Deployment, DeploymentMetrics, Package, PackageInfo,
};

pub const NOW: i64 = 1_700_000_000_000;
pub const DEFAULT_ACCESS_KEY_MAX_AGE_MS: i64 = 1000 * 60 * 60 * 24 * 60;

fn from_json<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> T {
    serde_json::from_value(value).expect("fixture must deserialize")
}

/// Management service stub returning fixed fixtures and recording calls
#[derive(Default)]
pub struct RecordingSdk {
    calls: Mutex<Vec<String>>,
    releases: Mutex<Vec<ReleaseCommand>>,
    package_infos: Mutex<Vec<PackageInfo>>,
    fail_with: Option<String>,
    history: Option<serde_json::Value>,
}

impl RecordingSdk {
    /// Every operation fails with the given message
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Default::default()
        }
    }

    /// Deployment history is the given JSON array instead of the fixture
    pub fn with_history(history: serde_json::Value) -> Self {
        Self {
            history: Some(history),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called(&self, operation: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.split(' ').next() == Some(operation))
            .count()
    }

    pub fn releases(&self) -> Vec<ReleaseCommand> {
        self.releases.lock().unwrap().clone()
    }

    pub fn package_infos(&self) -> Vec<PackageInfo> {
        self.package_infos.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> SdkResult<()> {
        self.calls.lock().unwrap().push(call);
        match &self.fail_with {
            Some(message) => Err(RemoteError::with_status(500, message.clone())),
            None => Ok(()),
        }
    }

    fn expires(max_age: Option<Duration>) -> i64 {
        NOW + max_age
            .map(|age| age.as_millis() as i64)
            .unwrap_or(DEFAULT_ACCESS_KEY_MAX_AGE_MS)
    }
}

#[async_trait]
impl ManagementSdk for RecordingSdk {
    async fn get_account_info(&self) -> SdkResult<Account> {
        self.record("get_account_info".into())?;
        Ok(from_json(json!({ "email": "a@a.com" })))
    }

    async fn get_access_keys(&self) -> SdkResult<Vec<AccessKey>> {
        self.record("get_access_keys".into())?;
        Ok(from_json(json!([{
            "createdTime": 0,
            "createdBy": "test-host",
            "friendlyName": "Test name",
            "expires": NOW + DEFAULT_ACCESS_KEY_MAX_AGE_MS
        }])))
    }

    async fn add_access_key(
        &self,
        friendly_name: &str,
        max_age: Option<Duration>,
    ) -> SdkResult<AccessKey> {
        self.record(format!("add_access_key {friendly_name}"))?;
        Ok(AccessKey {
            name: Some("key123".to_string()),
            created_time: NOW,
            created_by: "test-host".to_string(),
            friendly_name: friendly_name.to_string(),
            expires: Self::expires(max_age),
            description: None,
            is_session: None,
        })
    }

    async fn edit_access_key(
        &self,
        old_friendly_name: &str,
        new_friendly_name: Option<&str>,
        max_age: Option<Duration>,
    ) -> SdkResult<AccessKey> {
        self.record(format!("edit_access_key {old_friendly_name}"))?;
        Ok(AccessKey {
            name: None,
            created_time: NOW,
            created_by: "test-host".to_string(),
            friendly_name: new_friendly_name.unwrap_or(old_friendly_name).to_string(),
            expires: Self::expires(max_age),
            description: None,
            is_session: None,
        })
    }

    async fn remove_access_key(&self, name: &str) -> SdkResult<()> {
        self.record(format!("remove_access_key {name}"))
    }

    async fn get_apps(&self) -> SdkResult<Vec<App>> {
        self.record("get_apps".into())?;
        Ok(from_json(json!([
            { "name": "a", "collaborators": { "a@a.com": { "permission": "Owner", "isCurrentAccount": true } } },
            { "name": "b", "collaborators": { "a@a.com": { "permission": "Owner", "isCurrentAccount": true } } }
        ])))
    }

    async fn add_app(&self, app_name: &str) -> SdkResult<App> {
        self.record(format!("add_app {app_name}"))?;
        Ok(from_json(json!({ "name": app_name })))
    }

    async fn remove_app(&self, app_name: &str) -> SdkResult<()> {
        self.record(format!("remove_app {app_name}"))
    }

    async fn rename_app(&self, old_app_name: &str, new_app_name: &str) -> SdkResult<()> {
        self.record(format!("rename_app {old_app_name} {new_app_name}"))
    }

    async fn transfer_app(&self, app_name: &str, email: &str) -> SdkResult<()> {
        self.record(format!("transfer_app {app_name} {email}"))
    }

    async fn get_collaborators(&self, app_name: &str) -> SdkResult<CollaboratorMap> {
        self.record(format!("get_collaborators {app_name}"))?;
        Ok(from_json(json!({
            "a@a.com": { "permission": "Owner", "isCurrentAccount": true },
            "b@b.com": { "permission": "Collaborator", "isCurrentAccount": false }
        })))
    }

    async fn add_collaborator(&self, app_name: &str, email: &str) -> SdkResult<()> {
        self.record(format!("add_collaborator {app_name} {email}"))
    }

    async fn remove_collaborator(&self, app_name: &str, email: &str) -> SdkResult<()> {
        self.record(format!("remove_collaborator {app_name} {email}"))
    }

    async fn get_deployments(&self, app_name: &str) -> SdkResult<Vec<Deployment>> {
        self.record(format!("get_deployments {app_name}"))?;
        Ok(from_json(json!([
            { "name": "Production", "key": "6" },
            {
                "name": "Staging",
                "key": "6",
                "package": {
                    "appVersion": "1.0.0",
                    "description": "fgh",
                    "label": "v2",
                    "packageHash": "jkl",
                    "isMandatory": true,
                    "size": 10,
                    "blobUrl": "http://mno.pqr",
                    "uploadTime": 1000
                }
            }
        ])))
    }

    async fn add_deployment(
        &self,
        app_name: &str,
        deployment_name: &str,
    ) -> SdkResult<Deployment> {
        self.record(format!("add_deployment {app_name} {deployment_name}"))?;
        Ok(from_json(json!({ "name": deployment_name, "key": "6" })))
    }

    async fn remove_deployment(&self, app_name: &str, deployment_name: &str) -> SdkResult<()> {
        self.record(format!("remove_deployment {app_name} {deployment_name}"))
    }

    async fn rename_deployment(
        &self,
        app_name: &str,
        old_deployment_name: &str,
        new_deployment_name: &str,
    ) -> SdkResult<()> {
        self.record(format!(
            "rename_deployment {app_name} {old_deployment_name} {new_deployment_name}"
        ))
    }

    async fn get_deployment_history(
        &self,
        app_name: &str,
        deployment_name: &str,
    ) -> SdkResult<Vec<Package>> {
        self.record(format!("get_deployment_history {app_name} {deployment_name}"))?;
        if let Some(history) = &self.history {
            return Ok(from_json(history.clone()));
        }
        Ok(from_json(json!([
            {
                "description": null,
                "appVersion": "1.0.0",
                "isMandatory": false,
                "packageHash": "463acc7d06adc9c46233481d87d9e8264b3e9ffe60fe98d721e6974209dc71a0",
                "blobUrl": "https://fakeblobstorage.net/storagev2/blobid1",
                "uploadTime": 1447113596270i64,
                "size": 1,
                "label": "v1"
            },
            {
                "description": "New update - this update does a whole bunch of things, including testing linewrapping",
                "appVersion": "1.0.1",
                "isMandatory": false,
                "packageHash": "463acc7d06adc9c46233481d87d9e8264b3e9ffe60fe98d721e6974209dc71a0",
                "blobUrl": "https://fakeblobstorage.net/storagev2/blobid2",
                "uploadTime": 1447118476669i64,
                "size": 2,
                "label": "v2"
            }
        ])))
    }

    async fn clear_deployment_history(
        &self,
        app_name: &str,
        deployment_name: &str,
    ) -> SdkResult<()> {
        self.record(format!("clear_deployment_history {app_name} {deployment_name}"))
    }

    async fn get_deployment_metrics(
        &self,
        app_name: &str,
        deployment_name: &str,
    ) -> SdkResult<DeploymentMetrics> {
        self.record(format!("get_deployment_metrics {app_name} {deployment_name}"))?;
        Ok(from_json(json!({
            "1.0.0": { "active": 123 },
            "v1": { "active": 789, "downloaded": 456, "failed": 654, "installed": 987 },
            "v2": { "active": 123, "downloaded": 321, "failed": 789, "installed": 456 }
        })))
    }

    async fn release(&self, command: &ReleaseCommand) -> SdkResult<String> {
        self.record(format!(
            "release {} {}",
            command.app_name, command.deployment_name
        ))?;
        self.releases.lock().unwrap().push(command.clone());
        Ok("Successfully released".to_string())
    }

    async fn patch_release(
        &self,
        app_name: &str,
        deployment_name: &str,
        label: Option<&str>,
        info: &PackageInfo,
    ) -> SdkResult<()> {
        self.record(format!(
            "patch_release {app_name} {deployment_name} {}",
            label.unwrap_or("-")
        ))?;
        self.package_infos.lock().unwrap().push(info.clone());
        Ok(())
    }

    async fn promote(
        &self,
        app_name: &str,
        source_deployment_name: &str,
        dest_deployment_name: &str,
        info: &PackageInfo,
    ) -> SdkResult<()> {
        self.record(format!(
            "promote {app_name} {source_deployment_name} {dest_deployment_name}"
        ))?;
        self.package_infos.lock().unwrap().push(info.clone());
        Ok(())
    }

    async fn rollback(
        &self,
        app_name: &str,
        deployment_name: &str,
        target_release: Option<&str>,
    ) -> SdkResult<()> {
        self.record(format!(
            "rollback {app_name} {deployment_name} {}",
            target_release.unwrap_or("-")
        ))
    }
}

/// Answers every confirmation with a fixed value
pub struct FixedPrompter {
    answer: bool,
    asked: Mutex<Vec<String>>,
}

impl FixedPrompter {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }
}

#[async_trait]
impl Prompter for FixedPrompter {
    async fn confirm(&self, message: &str) -> io::Result<bool> {
        self.asked.lock().unwrap().push(message.to_string());
        Ok(self.answer)
    }
}

/// Collects logged output
#[derive(Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl OutputSink for RecordingSink {
    fn log(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// Process runner that records invocations instead of launching them
pub struct RecordingRunner {
    sync_calls: Mutex<Vec<Invocation>>,
    spawn_calls: Mutex<Vec<Invocation>>,
    sync_code: Option<i32>,
    sync_error: bool,
    spawn_code: Option<i32>,
    spawn_delay: Option<Duration>,
    available: Option<Vec<String>>,
}

impl Default for RecordingRunner {
    fn default() -> Self {
        Self {
            sync_calls: Mutex::new(Vec::new()),
            spawn_calls: Mutex::new(Vec::new()),
            sync_code: Some(0),
            sync_error: false,
            spawn_code: Some(0),
            spawn_delay: None,
            available: None,
        }
    }
}

impl RecordingRunner {
    pub fn with_sync_code(mut self, code: Option<i32>) -> Self {
        self.sync_code = code;
        self
    }

    pub fn with_sync_error(mut self) -> Self {
        self.sync_error = true;
        self
    }

    pub fn with_spawn_code(mut self, code: Option<i32>) -> Self {
        self.spawn_code = code;
        self
    }

    pub fn with_spawn_delay(mut self, delay: Duration) -> Self {
        self.spawn_delay = Some(delay);
        self
    }

    /// Restrict `is_available` to the listed programs
    pub fn with_available(mut self, programs: &[&str]) -> Self {
        self.available = Some(programs.iter().map(|p| p.to_string()).collect());
        self
    }

    pub fn sync_calls(&self) -> Vec<Invocation> {
        self.sync_calls.lock().unwrap().clone()
    }

    pub fn spawn_calls(&self) -> Vec<Invocation> {
        self.spawn_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProcessRunner for RecordingRunner {
    fn run_sync(&self, invocation: &Invocation) -> io::Result<ProcessOutput> {
        self.sync_calls.lock().unwrap().push(invocation.clone());
        if self.sync_error {
            return Err(io::Error::new(io::ErrorKind::Other, "command failed"));
        }
        Ok(ProcessOutput {
            code: self.sync_code,
            ..Default::default()
        })
    }

    async fn spawn(&self, invocation: &Invocation) -> io::Result<Option<i32>> {
        self.spawn_calls.lock().unwrap().push(invocation.clone());
        if let Some(delay) = self.spawn_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.spawn_code)
    }

    fn is_available(&self, program: &str) -> bool {
        match &self.available {
            Some(programs) => programs.iter().any(|p| p == program),
            None => true,
        }
    }
}

/// A session wired to recording collaborators
pub struct TestHarness {
    pub sdk: Arc<RecordingSdk>,
    pub prompter: Arc<FixedPrompter>,
    pub sink: Arc<RecordingSink>,
    pub runner: Arc<RecordingRunner>,
    pub session: Session,
}

impl TestHarness {
    pub fn new(cwd: &Path, temp_dir: &Path) -> Self {
        Self::build(RecordingSdk::default(), true, RecordingRunner::default(), cwd, temp_dir)
    }

    pub fn build(
        sdk: RecordingSdk,
        confirm: bool,
        runner: RecordingRunner,
        cwd: &Path,
        temp_dir: &Path,
    ) -> Self {
        let sdk = Arc::new(sdk);
        let prompter = Arc::new(FixedPrompter::new(confirm));
        let sink = Arc::new(RecordingSink::default());
        let runner = Arc::new(runner);
        let session = Session::new(
            sdk.clone(),
            prompter.clone(),
            sink.clone(),
            runner.clone(),
            cwd,
        )
        .with_temp_dir(temp_dir);

        Self {
            sdk,
            prompter,
            sink,
            runner,
            session,
        }
    }
}
