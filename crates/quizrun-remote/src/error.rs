//! Remote API error types.

use thiserror::Error;

/// Errors that can occur when talking to the quiz service.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// A blank quiz code was given; no request is made.
    #[error("please enter a quiz code")]
    EmptyQuizCode,

    /// The service answered but reported `success: false`.
    #[error("{0}")]
    Rejected(String),

    /// The service returned an error status.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The response body was not what the service should send.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
