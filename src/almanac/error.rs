//! Upstream fetch errors.

use thiserror::Error;

use super::retry::Transient;

/// Everything that can stop the upstream almanac from producing a record.
///
/// None of these reach callers of the provider; each one routes the
/// request to the local fallback generator.
#[derive(Debug, Error)]
pub enum FetchError {
    /// No API credential is configured.
    #[error("TIANAPI_KEY is not configured")]
    MissingCredential,

    /// Timeout or connection failure. The only retryable error.
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Any other transport-level failure (body read, redirect, ...).
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Server returned a non-success HTTP status code.
    #[error("HTTP status {0}")]
    Status(u16),

    /// The body was not the expected JSON envelope.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The API answered but refused the request, or sent no result.
    #[error("API returned code {code}: {message}")]
    Rejected { code: i64, message: String },
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            Self::Network(err)
        } else {
            Self::Request(err)
        }
    }
}

impl Transient for FetchError {
    fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}
