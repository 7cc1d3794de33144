//! Error types for the CodePush CLI core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using CodePushError
pub type Result<T> = std::result::Result<T, CodePushError>;

/// Main error type for command execution
#[derive(Debug, Error)]
pub enum CodePushError {
    /// Invalid user input, rejected before any remote mutation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The CWD does not follow the framework's project conventions
    #[error(transparent)]
    Convention(#[from] ConventionError),

    /// Native build tool or bundler failure
    #[error(transparent)]
    Build(#[from] BuildError),

    /// Failure reported by the remote management service
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Client configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Input validation failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please use a semver-compliant target binary version range, for example \"1.0.0\", \"*\" or \"^1.2.3\".")]
    InvalidTargetBinaryRange,

    #[error("It is unnecessary to package releases in a .zip or binary file. Please specify the direct path to the update content's directory (e.g. /platforms/ios/www) or file (e.g. main.jsbundle).")]
    BinaryOrZipPackage,

    #[error("At least one property must be specified to patch a release.")]
    EmptyPatch,

    #[error("Rollout value must be an integer between 1 and 100 inclusive.")]
    InvalidRollout,

    #[error("A new name and/or expiry must be provided.")]
    EmptyAccessKeyEdit,

    #[error("The specified package path \"{0}\" does not exist.")]
    PackageNotFound(PathBuf),
}

/// Project convention failures (missing manifest, entry file, platform)
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConventionError {
    #[error("Platform must be either \"ios\" or \"android\".")]
    UnsupportedCordovaPlatform,

    #[error("Platform must be either \"android\", \"ios\" or \"windows\".")]
    UnsupportedReactPlatform,

    #[error("Unable to find or read \"{manifest}\" in the CWD. The \"{command}\" command must be executed in a {framework} project folder.")]
    ManifestUnreadable {
        manifest: &'static str,
        command: &'static str,
        framework: &'static str,
    },

    #[error("Unable to find a version in \"{manifest}\". Please specify a target binary version range explicitly.")]
    ManifestVersionMissing { manifest: &'static str },

    #[error("Entry file \"{0}\" does not exist.")]
    EntryFileMissing(String),
}

/// Build step failures
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Unable to {step} project. Please ensure that the CWD represents a Cordova project and that the \"{platform}\" platform was added by running \"cordova platform add {platform}\".")]
    CordovaStep {
        step: &'static str,
        platform: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Unable to find \"cordova\" or \"phonegap\". Please ensure that either the Cordova or PhoneGap CLI is installed.")]
    CordovaCliNotFound,

    #[error("\"react-native bundle\" command exited with code {0}.")]
    BundlerExited(i32),

    #[error("\"react-native bundle\" command was terminated before it completed.")]
    BundlerTerminated,

    #[error("Unable to launch \"{program}\": {source}")]
    BundlerLaunch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("\"react-native bundle\" command timed out after {0}s.")]
    BundlerTimeout(u64),
}

/// Opaque failure from the remote management service
#[derive(Debug, Error)]
#[error("{message}")]
pub struct RemoteError {
    /// HTTP status, when the failure came from a response
    pub status: Option<u16>,
    /// Message surfaced to the user unchanged
    pub message: String,
}

impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("You are not currently logged in. Run the \"code-push login\" command to authenticate with the CodePush server.")]
    NotLoggedIn,

    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    #[error("Failed to parse configuration at {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

impl CodePushError {
    /// Exit code reported by the CLI for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 5,
            Self::Convention(_) => 6,
            Self::Remote(_) => 7,
            Self::Build(_) => 10,
            Self::Config(_) => 2,
            Self::Io(_) | Self::Json(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cordova_step_message_names_platform() {
        let err = BuildError::CordovaStep {
            step: "prepare",
            platform: "ios".to_string(),
            source: None,
        };
        assert_eq!(
            err.to_string(),
            "Unable to prepare project. Please ensure that the CWD represents a Cordova project and that the \"ios\" platform was added by running \"cordova platform add ios\"."
        );
    }

    #[test]
    fn test_manifest_message() {
        let err = ConventionError::ManifestUnreadable {
            manifest: "package.json",
            command: "release-react",
            framework: "React Native",
        };
        assert_eq!(
            err.to_string(),
            "Unable to find or read \"package.json\" in the CWD. The \"release-react\" command must be executed in a React Native project folder."
        );
    }

    #[test]
    fn test_remote_error_is_surfaced_unchanged() {
        let err: CodePushError = RemoteError::with_status(404, "App not found").into();
        assert_eq!(err.to_string(), "App not found");
        assert_eq!(err.exit_code(), 7);
    }
}
