//! React Native bundler and Cordova build invocation

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use crate::conventions::{CordovaPlatform, ReactPlatform};
use crate::error::BuildError;
use crate::process::{Invocation, ProcessRunner};

const NODE: &str = "node";
const CORDOVA_CLIS: &[&str] = &["cordova", "phonegap"];

/// Resolved inputs of one `react-native bundle` run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleRequest {
    pub platform: ReactPlatform,
    pub entry_file: String,
    pub bundle_name: String,
    /// Receives both the bundle and its assets
    pub output_dir: PathBuf,
    pub development: bool,
    pub sourcemap_output: Option<PathBuf>,
}

/// Path of the React Native CLI script, relative to the project root
pub fn react_native_cli() -> PathBuf {
    ["node_modules", "react-native", "local-cli", "cli.js"]
        .iter()
        .collect()
}

/// Build the `node .../cli.js bundle ...` invocation
pub fn bundler_invocation(cwd: &Path, request: &BundleRequest) -> Invocation {
    let bundle_output = request.output_dir.join(&request.bundle_name);

    let mut invocation = Invocation::new(NODE, cwd).args([
        react_native_cli().display().to_string(),
        "bundle".to_string(),
        "--assets-dest".to_string(),
        request.output_dir.display().to_string(),
        "--bundle-output".to_string(),
        bundle_output.display().to_string(),
        "--dev".to_string(),
        request.development.to_string(),
        "--entry-file".to_string(),
        request.entry_file.clone(),
        "--platform".to_string(),
        request.platform.as_str().to_string(),
    ]);

    if let Some(sourcemap) = &request.sourcemap_output {
        invocation = invocation
            .arg("--sourcemap-output")
            .arg(sourcemap.display().to_string());
    }

    invocation
}

/// Run the bundler once, failing on launch errors, non-zero exit or timeout
#[instrument(skip(runner, request), fields(platform = %request.platform))]
pub async fn run_react_bundler(
    runner: &dyn ProcessRunner,
    cwd: &Path,
    request: &BundleRequest,
    timeout: Option<Duration>,
) -> Result<(), BuildError> {
    let invocation = bundler_invocation(cwd, request);
    info!(command = %invocation.command_line(), "Running \"react-native bundle\"");

    let spawned = runner.spawn(&invocation);
    let result = match timeout {
        Some(limit) => tokio::time::timeout(limit, spawned)
            .await
            .map_err(|_| BuildError::BundlerTimeout(limit.as_secs()))?,
        None => spawned.await,
    };

    match result {
        Ok(Some(0)) => Ok(()),
        Ok(Some(code)) => Err(BuildError::BundlerExited(code)),
        Ok(None) => Err(BuildError::BundlerTerminated),
        Err(source) => Err(BuildError::BundlerLaunch {
            program: invocation.program,
            source,
        }),
    }
}

/// Pick the Cordova CLI, preferring `cordova` over `phonegap`
pub fn resolve_cordova_cli(runner: &dyn ProcessRunner) -> Result<&'static str, BuildError> {
    CORDOVA_CLIS
        .iter()
        .copied()
        .find(|cli| runner.is_available(cli))
        .ok_or(BuildError::CordovaCliNotFound)
}

/// Run `<cli> prepare|build <platform>` synchronously
#[instrument(skip(runner))]
pub fn run_cordova_step(
    runner: &dyn ProcessRunner,
    cwd: &Path,
    cli: &str,
    platform: CordovaPlatform,
    build: bool,
) -> Result<(), BuildError> {
    let step = if build { "build" } else { "prepare" };
    let invocation = Invocation::new(cli, cwd).args([step, platform.as_str()]);
    info!(command = %invocation.command_line(), "Running Cordova {}", step);

    let failure = |source| BuildError::CordovaStep {
        step,
        platform: platform.to_string(),
        source,
    };

    match runner.run_sync(&invocation) {
        Ok(output) if output.success() => {
            debug!(stdout = %output.stdout, "Cordova {} finished", step);
            Ok(())
        }
        Ok(output) => {
            warn!(code = ?output.code, stderr = %output.stderr, "Cordova {} failed", step);
            Err(failure(None))
        }
        Err(e) => Err(failure(Some(e))),
    }
}
