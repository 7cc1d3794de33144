//! SDK error types

use codepush_core::RemoteError;
use thiserror::Error;

/// Errors raised while talking to the management service
#[derive(Debug, Error)]
pub enum SdkError {
    /// Non-success response from the service
    #[error("{message}")]
    ApiError { status: u16, message: String },

    /// Server URL could not be parsed or extended
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Release content could not be packaged
    #[error("Failed to package release: {0}")]
    Packaging(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Zip error
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

impl From<SdkError> for RemoteError {
    fn from(err: SdkError) -> Self {
        match err {
            SdkError::ApiError { status, message } => RemoteError::with_status(status, message),
            SdkError::Http(e) => match e.status() {
                Some(status) => RemoteError::with_status(status.as_u16(), e.to_string()),
                None => RemoteError::new(e.to_string()),
            },
            other => RemoteError::new(other.to_string()),
        }
    }
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;
