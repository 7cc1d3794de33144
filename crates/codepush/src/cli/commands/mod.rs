//! CLI commands

mod access_key;
mod app;
mod collaborator;
mod completions;
mod deployment;
mod release;
mod session;
mod update;

pub use access_key::AccessKeyCommand;
pub use app::AppCommand;
pub use collaborator::CollaboratorCommand;
pub use completions::CompletionsCommand;
pub use deployment::DeploymentCommand;
pub use release::{ReleaseCommand, ReleaseCordovaCommand, ReleaseReactCommand};
pub use session::{LoginCommand, LogoutCommand};
pub use update::{PatchCommand, PromoteCommand, RollbackCommand};
