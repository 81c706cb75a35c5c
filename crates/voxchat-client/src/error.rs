//! Error types for the HTTP transport layer.

use voxchat_core::error::VoxError;

/// Errors from the responder and transcription clients.
///
/// The distinction between variants matters to the chat layer: only
/// `Server` carries a message the backend chose for the user, so only that
/// text is surfaced verbatim; everything else falls back to a local message
/// at the operation boundary.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered with an error status and a human-readable message.
    #[error("{message}")]
    Server { status: u16, message: String },
    /// The server answered with an error status and no usable body.
    #[error("request failed with HTTP status {0}")]
    Status(u16),
    /// The request hit the client-side timeout.
    #[error("request timed out")]
    Timeout,
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),
    /// A well-formed reply that is missing the expected fields.
    #[error("{0}")]
    Content(String),
}

impl ClientError {
    /// Classify a `reqwest` failure, keeping timeouts distinct.
    pub(crate) fn from_request(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<ClientError> for VoxError {
    fn from(err: ClientError) -> Self {
        VoxError::Transport(err.to_string())
    }
}
