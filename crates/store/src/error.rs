use thiserror::Error;

use crate::RecordId;

/// Errors surfaced by the persistence backends.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// URL or access key missing; the store refuses to issue requests.
    #[error("store is not configured")]
    NotConfigured,
    /// The request never got an HTTP answer.
    #[error("http request failed: {0}")]
    Http(String),
    /// The data service answered with a non-success status.
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    /// A write succeeded but returned no representation.
    #[error("no row returned")]
    NoRowReturned,
    #[error("record {0} not found")]
    NotFound(RecordId),
    /// The answer could not be decoded into the expected rows.
    #[error("invalid response: {0}")]
    Decode(String),
    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        StoreError::Backend(msg.into())
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Decode(err.to_string())
        } else {
            StoreError::Http(err.to_string())
        }
    }
}
