//! Error types for speech input.

use voxchat_core::error::VoxError;

/// Errors from the speech input adapter.
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("speech recognition is not supported in this environment")]
    NotSupported,
    #[error("recognition is already running")]
    AlreadyListening,
    #[error("recognition is not running")]
    NotListening,
    #[error("recognition engine error: {0}")]
    Engine(String),
}

impl From<SpeechError> for VoxError {
    fn from(err: SpeechError) -> Self {
        VoxError::Speech(err.to_string())
    }
}
