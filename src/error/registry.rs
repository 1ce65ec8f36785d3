//! Package registry and network fetch errors

use thiserror::Error;

use super::BuilderError;

/// Failure of a single fetch performed by a [`crate::fetch::Fetch`] implementation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("response from {url} is not valid JSON: {reason}")]
    Decode { url: String, reason: String },
}

impl FetchError {
    /// URL of the request that failed
    pub fn url(&self) -> &str {
        match self {
            FetchError::Status { url, .. }
            | FetchError::Timeout { url }
            | FetchError::Transport { url, .. }
            | FetchError::Decode { url, .. } => url,
        }
    }
}

/// Creates a registry unavailable error
pub fn unavailable(url: impl Into<String>, reason: impl Into<String>) -> BuilderError {
    BuilderError::RegistryUnavailable {
        url: url.into(),
        reason: reason.into(),
    }
}

/// Creates a template fetch failed error
pub fn template_fetch_failed(
    name: impl Into<String>,
    url: impl Into<String>,
    reason: impl Into<String>,
) -> BuilderError {
    BuilderError::TemplateFetchFailed {
        name: name.into(),
        url: url.into(),
        reason: reason.into(),
    }
}

impl From<FetchError> for BuilderError {
    fn from(err: FetchError) -> Self {
        unavailable(err.url().to_string(), err.to_string())
    }
}
