//! Error types for the chat interaction layer.
//!
//! Operation failures never propagate past the controller: transport and
//! content errors are absorbed into the conversation log and the
//! notification slot. `ChatError` only covers the local checks that reject
//! an operation before it starts.

use voxchat_core::error::VoxError;

/// Errors raised by local checks in the chat layer.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// A file failed validation before any network activity.
    #[error("{0}")]
    Validation(String),
}

impl From<ChatError> for VoxError {
    fn from(err: ChatError) -> Self {
        VoxError::Chat(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_is_verbatim() {
        let err = ChatError::Validation("Unsupported audio format".to_string());
        assert_eq!(err.to_string(), "Unsupported audio format");
    }

    #[test]
    fn test_conversion_to_vox_error() {
        let err: VoxError = ChatError::Validation("too big".to_string()).into();
        assert!(matches!(err, VoxError::Chat(_)));
    }
}
