//! Exit codes for the CLI
//!
//! Library errors carry their own category code; anything else is a general
//! failure.

use codepush_core::CodePushError;

/// General error
pub const ERROR: i32 = 1;

/// Exit code for an error returned by a command
pub fn for_error(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<CodePushError>()
        .map_or(ERROR, CodePushError::exit_code)
}
