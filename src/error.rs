//! Error types for the KeyHub console client.

use thiserror::Error;

/// Failure taxonomy for console operations.
///
/// Every backend response is normalized into this shape at the API wrapper
/// boundary, regardless of which failure-signaling convention the endpoint
/// uses (`error` field, `success: false`, or a bare `message` on a 4xx).
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP 401 from any endpoint. The stored session token has already
    /// been cleared by the time this error is observed.
    #[error("unauthorized, please log in again")]
    Unauthorized,

    /// Network, DNS, or response-decoding failure.
    #[error("request failed: {0}")]
    Transport(String),

    /// The backend accepted the request but rejected the operation.
    /// Carries the server-supplied message verbatim.
    #[error("{0}")]
    Rejected(String),
}

impl ApiError {
    /// Create a rejection with a server-supplied message, falling back to
    /// a generic message when the body carried none.
    pub fn rejected(message: Option<String>) -> Self {
        Self::Rejected(message.unwrap_or_else(|| "request rejected".to_string()))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Result type for console operations.
pub type Result<T> = std::result::Result<T, ApiError>;
