//! CodePush Core - command execution and release-bundling pipeline
//!
//! This crate turns a typed [`Command`] into validated calls against the
//! management service, building React Native and Cordova releases on the way
//! when needed. Collaborators (service SDK, confirmation prompt, output sink,
//! process runner) are injected through a [`Session`].

pub mod bundler;
pub mod command;
pub mod config;
pub mod conventions;
pub mod dispatcher;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod process;
pub mod sdk;
pub mod session;
pub mod types;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

pub use command::{Command, OutputFormat, ReleaseCommand};
pub use config::ClientConfig;
pub use dispatcher::Dispatcher;
pub use error::{
    BuildError, CodePushError, ConfigError, ConventionError, RemoteError, Result, ValidationError,
};
pub use pipeline::{ReleasePipeline, ReleaseStage};
pub use process::{Invocation, ProcessOutput, ProcessRunner, SystemProcessRunner};
pub use sdk::{ManagementSdk, SdkResult};
pub use session::{OutputSink, Prompter, Session};
