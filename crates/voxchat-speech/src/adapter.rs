//! The speech input adapter.
//!
//! Owns the listening flag and the live transcript channel. The flag is
//! toggled only through `start`/`stop`; nothing outside this adapter writes
//! it directly.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use crate::error::SpeechError;
use crate::recognizer::{SpeechRecognizer, TranscriptSink};

/// Wraps a [`SpeechRecognizer`] with listening state and a live transcript.
pub struct SpeechInput {
    recognizer: Arc<dyn SpeechRecognizer>,
    listening: AtomicBool,
    transcript: Arc<watch::Sender<String>>,
}

impl SpeechInput {
    /// Create an adapter over the given recognition engine.
    pub fn new(recognizer: Arc<dyn SpeechRecognizer>) -> Self {
        let (tx, _rx) = watch::channel(String::new());
        Self {
            recognizer,
            listening: AtomicBool::new(false),
            transcript: Arc::new(tx),
        }
    }

    /// Whether recognition is available in this environment.
    pub fn is_supported(&self) -> bool {
        self.recognizer.is_supported()
    }

    /// Whether continuous recognition is currently running.
    pub fn listening(&self) -> bool {
        self.listening.load(Ordering::Acquire)
    }

    /// The current running transcript.
    pub fn transcript(&self) -> String {
        self.transcript.borrow().clone()
    }

    /// Subscribe to transcript changes.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.transcript.subscribe()
    }

    /// Begin continuous recognition.
    ///
    /// Fails if the capability is unsupported or recognition is already
    /// running. On engine failure the listening flag is rolled back.
    pub fn start(&self) -> Result<(), SpeechError> {
        if !self.recognizer.is_supported() {
            return Err(SpeechError::NotSupported);
        }
        if self
            .listening
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SpeechError::AlreadyListening);
        }

        let sink = TranscriptSink::new(Arc::clone(&self.transcript));
        if let Err(e) = self.recognizer.start(sink) {
            self.listening.store(false, Ordering::Release);
            return Err(e);
        }
        tracing::info!("Listening for speech");
        Ok(())
    }

    /// Stop recognition immediately.
    ///
    /// Fails only if recognition is not running; the transcript keeps its
    /// last value until `reset`.
    pub fn stop(&self) -> Result<(), SpeechError> {
        if self
            .listening
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SpeechError::NotListening);
        }
        self.recognizer.stop();
        tracing::info!("Stopped listening for speech");
        Ok(())
    }

    /// Clear the transcript ahead of a new utterance.
    pub fn reset(&self) {
        self.transcript.send_replace(String::new());
    }
}

// =============================================================================
// Tests
// =============================================================================
