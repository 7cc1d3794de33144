//! HTTP client for the CodePush management service
//!
//! [`HttpSdk`] implements [`codepush_core::ManagementSdk`] over `reqwest`,
//! zipping release content before upload.
//!
//! ```ignore
//! use codepush_sdk::HttpSdk;
//!
//! let sdk = HttpSdk::new("https://codepush.appcenter.ms", access_key, None)?;
//! let account = sdk.get_account_info().await?;
//! ```

pub mod client;
pub mod error;
pub mod packaging;

pub use client::HttpSdk;
pub use error::SdkError;
pub use packaging::package_release;
