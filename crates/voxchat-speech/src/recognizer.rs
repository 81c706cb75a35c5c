//! The speech recognition capability seam.
//!
//! The actual engine is an external collaborator; VoxChat only needs a
//! support flag, continuous start/stop, and somewhere to push the running
//! transcript. Engines implement [`SpeechRecognizer`] and write recognized
//! text through the [`TranscriptSink`] handed to `start`.

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::SpeechError;

/// Writer for the running transcript of the current utterance.
///
/// Each push replaces the previous value (last-write-wins); the engine is
/// expected to send the full recognized utterance so far, not a delta.
#[derive(Clone, Debug)]
pub struct TranscriptSink {
    tx: Arc<watch::Sender<String>>,
}

impl TranscriptSink {
    pub(crate) fn new(tx: Arc<watch::Sender<String>>) -> Self {
        Self { tx }
    }

    /// Replace the transcript with `text`.
    pub fn push(&self, text: impl Into<String>) {
        self.tx.send_replace(text.into());
    }
}

/// A continuous-mode speech-to-text engine.
pub trait SpeechRecognizer: Send + Sync {
    /// Whether recognition is available in this environment at all.
    fn is_supported(&self) -> bool;

    /// Begin continuous recognition, pushing the running transcript into
    /// `sink` until `stop` is called.
    fn start(&self, sink: TranscriptSink) -> Result<(), SpeechError>;

    /// Stop recognition immediately. Must be safe to call when idle.
    fn stop(&self);
}

/// Platform speech engine stub.
///
/// Availability is platform-gated; the real engine binding slots in behind
/// [`SpeechRecognizer`] without touching the adapter or controller.
#[derive(Debug, Default)]
pub struct SystemRecognizer;

impl SystemRecognizer {
    pub fn new() -> Self {
        Self
    }
}

impl SpeechRecognizer for SystemRecognizer {
    fn is_supported(&self) -> bool {
        cfg!(target_os = "windows")
    }

    fn start(&self, _sink: TranscriptSink) -> Result<(), SpeechError> {
        if !self.is_supported() {
            return Err(SpeechError::NotSupported);
        }
        tracing::info!("System speech recognition started");
        Ok(())
    }

    fn stop(&self) {
        tracing::info!("System speech recognition stopped");
    }
}

// =============================================================================
// Tests
// =============================================================================
