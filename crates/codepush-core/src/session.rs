//! Per-invocation context threaded through the dispatcher

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::process::ProcessRunner;
use crate::sdk::ManagementSdk;

/// Asks the user to confirm a destructive operation
#[async_trait]
pub trait Prompter: Send + Sync {
    async fn confirm(&self, message: &str) -> io::Result<bool>;
}

/// Receives rendered command output
pub trait OutputSink: Send + Sync {
    fn log(&self, message: &str);
}

/// Collaborators and environment for one command execution
#[derive(Clone)]
pub struct Session {
    pub sdk: Arc<dyn ManagementSdk>,
    pub prompter: Arc<dyn Prompter>,
    pub sink: Arc<dyn OutputSink>,
    pub process: Arc<dyn ProcessRunner>,
    /// Project directory release commands resolve conventions against
    pub cwd: PathBuf,
    /// Parent of the default React Native output directory
    pub temp_dir: PathBuf,
    pub bundler_timeout: Option<Duration>,
}

impl Session {
    pub fn new(
        sdk: Arc<dyn ManagementSdk>,
        prompter: Arc<dyn Prompter>,
        sink: Arc<dyn OutputSink>,
        process: Arc<dyn ProcessRunner>,
        cwd: impl Into<PathBuf>,
    ) -> Self {
        Self {
            sdk,
            prompter,
            sink,
            process,
            cwd: cwd.into(),
            temp_dir: std::env::temp_dir(),
            bundler_timeout: None,
        }
    }

    pub fn with_temp_dir(mut self, temp_dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = temp_dir.into();
        self
    }

    pub fn with_bundler_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.bundler_timeout = timeout;
        self
    }

    pub fn log(&self, message: impl AsRef<str>) {
        self.sink.log(message.as_ref());
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("cwd", &self.cwd)
            .field("temp_dir", &self.temp_dir)
            .field("bundler_timeout", &self.bundler_timeout)
            .finish_non_exhaustive()
    }
}
