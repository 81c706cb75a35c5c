//! Audio upload pipeline: validate, transcribe, land the text in the buffer.
//!
//! Validation happens before the busy gate is consulted, so a rejected file
//! never flips the session busy. A successful transcription replaces the
//! input buffer (it does not append) and leaves a provenance entry in the
//! conversation log.

use std::sync::Arc;

use voxchat_client::error::ClientError;
use voxchat_client::transcribe::TranscriptionService;
use voxchat_core::types::{AudioSource, ConversationEntry, Severity};

use crate::error::ChatError;
use crate::notify::NotificationSlot;
use crate::state::SessionState;

/// MIME types the pipeline accepts for upload.
pub const ACCEPTED_MIME_TYPES: [&str; 6] = [
    "audio/wav",
    "audio/mpeg",
    "audio/mp3",
    "audio/ogg",
    "audio/mp4",
    "audio/x-m4a",
];

/// Raised when the file's MIME type is not in [`ACCEPTED_MIME_TYPES`].
pub const UNSUPPORTED_FORMAT: &str = "Unsupported audio format";

/// Success notice once the transcript has landed in the input buffer.
pub const TRANSCRIBED_NOTICE: &str = "Audio successfully transcribed";

/// Shown when transcription fails without a server-supplied explanation.
pub const UPLOAD_ERROR_FALLBACK: &str = "Audio processing failed";

/// What became of one `upload` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The transcript replaced the input buffer.
    Transcribed,
    /// The file failed local validation; no network activity happened.
    Rejected,
    /// The transcription request failed.
    Failed,
    /// Another operation was already in flight.
    Ignored,
}

/// Uploads an audio file for transcription into the input buffer.
#[derive(Clone)]
pub struct AudioUploadPipeline {
    state: Arc<SessionState>,
    notifications: Arc<NotificationSlot>,
    transcriber: Arc<dyn TranscriptionService>,
    max_file_bytes: u64,
}

impl AudioUploadPipeline {
    pub fn new(
        state: Arc<SessionState>,
        notifications: Arc<NotificationSlot>,
        transcriber: Arc<dyn TranscriptionService>,
        max_file_bytes: u64,
    ) -> Self {
        Self {
            state,
            notifications,
            transcriber,
            max_file_bytes,
        }
    }

    /// Local checks that run before any network activity.
    fn validate(&self, source: &AudioSource) -> Result<(), ChatError> {
        if source.len() > self.max_file_bytes {
            let max_mb = self.max_file_bytes / (1024 * 1024);
            return Err(ChatError::Validation(format!(
                "File too large (max {max_mb}MB allowed)"
            )));
        }
        if !ACCEPTED_MIME_TYPES.contains(&source.mime_type.as_str()) {
            return Err(ChatError::Validation(UNSUPPORTED_FORMAT.to_string()));
        }
        Ok(())
    }

    /// Upload `source` for transcription.
    ///
    /// Validation failures raise an `error` notification and leave the log
    /// untouched. On success the transcript replaces the input buffer, a
    /// `success` notification is raised, and an assistant entry records the
    /// transcript. Busy always returns to idle and progress to zero.
    pub async fn upload(&self, source: AudioSource) -> UploadOutcome {
        if let Err(e) = self.validate(&source) {
            tracing::warn!(
                file = %source.name,
                mime = %source.mime_type,
                size = source.len(),
                error = %e,
                "Upload rejected"
            );
            self.notifications.raise(e.to_string(), Severity::Error);
            return UploadOutcome::Rejected;
        }

        let Some(_guard) = self.state.try_begin_operation() else {
            tracing::debug!("Upload ignored: operation already in flight");
            return UploadOutcome::Ignored;
        };

        tracing::info!(file = %source.name, size = source.len(), "Uploading audio");
        let progress = self.state.progress().clone();
        match self.transcriber.transcribe(source, progress).await {
            Ok(text) => {
                self.state.set_input(text.clone());
                self.notifications.raise(TRANSCRIBED_NOTICE, Severity::Success);
                self.state.push_entry(ConversationEntry::assistant(format!(
                    "Audio transcription: {text}"
                )));
                UploadOutcome::Transcribed
            }
            Err(e) => {
                tracing::warn!(error = %e, "Transcription failed");
                let text = match &e {
                    ClientError::Server { message, .. } if !message.is_empty() => message.clone(),
                    ClientError::Server { .. } | ClientError::Status(_) => {
                        UPLOAD_ERROR_FALLBACK.to_string()
                    }
                    other => other.to_string(),
                };
                self.state.push_entry(ConversationEntry::error(text.clone()));
                self.notifications.raise(text, Severity::Error);
                UploadOutcome::Failed
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
