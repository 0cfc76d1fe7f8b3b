use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SmartContentError {
    /// Non-2xx answer from the analysis service. `message` is already the
    /// user-facing text (server `detail` or the endpoint fallback).
    #[error("{message}")]
    Backend { status: u16, message: String },

    #[error("Malformed response from {endpoint}: {reason}")]
    MalformedResponse {
        endpoint: &'static str,
        reason: String,
    },

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Session loop has shut down")]
    SessionClosed,

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, SmartContentError>;
