//! The chat interaction controller.
//!
//! Composition root of the chat layer: owns the session state, the
//! notification slot, the dispatch and upload operations, and the speech
//! adapter, and exposes the one surface the application drives. All three
//! input channels converge on the shared input buffer here.

use std::sync::Arc;
use std::time::Duration;

use voxchat_client::responder::ResponderService;
use voxchat_client::transcribe::TranscriptionService;
use voxchat_core::config::VoxConfig;
use voxchat_core::types::{AudioSource, ConversationEntry, Notification, Severity};
use voxchat_speech::adapter::SpeechInput;
use voxchat_speech::recognizer::SpeechRecognizer;

use crate::dispatch::{DispatchOutcome, MessageDispatch};
use crate::notify::NotificationSlot;
use crate::state::SessionState;
use crate::upload::{AudioUploadPipeline, UploadOutcome};

/// Cosmetic welcome banner. Rendered by the front-end only; it never
/// enters the conversation log and has no effect on state.
pub const GREETING: &str = "Hi! how can i assist you !!";

/// Raised when continuous recognition starts.
pub const LISTENING_PROMPT: &str = "Listening... Speak now";

/// Raised when continuous recognition stops.
pub const STOPPED_PROMPT: &str = "Stopped listening";

/// What became of one `toggle_listening` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Continuous recognition began.
    Started,
    /// Continuous recognition ended.
    Stopped,
    /// Unsupported, busy, or the engine refused to start.
    Ignored,
}

/// Drives one chat session across its three input channels.
#[derive(Clone)]
pub struct ChatController {
    state: Arc<SessionState>,
    notifications: Arc<NotificationSlot>,
    dispatch: MessageDispatch,
    upload: AudioUploadPipeline,
    speech: Arc<SpeechInput>,
}

impl ChatController {
    /// Wire a controller over the given services.
    pub fn new(
        responder: Arc<dyn ResponderService>,
        transcriber: Arc<dyn TranscriptionService>,
        recognizer: Arc<dyn SpeechRecognizer>,
        config: &VoxConfig,
    ) -> Self {
        let state = Arc::new(SessionState::new());
        let notifications = Arc::new(NotificationSlot::new(Duration::from_secs(
            config.notify.auto_dismiss_secs,
        )));
        let dispatch = MessageDispatch::new(
            Arc::clone(&state),
            Arc::clone(&notifications),
            responder,
        );
        let upload = AudioUploadPipeline::new(
            Arc::clone(&state),
            Arc::clone(&notifications),
            transcriber,
            config.upload.max_file_bytes,
        );
        let speech = Arc::new(SpeechInput::new(recognizer));

        Self {
            state,
            notifications,
            dispatch,
            upload,
            speech,
        }
    }

    // ----- Input buffer ------------------------------------------------------

    /// Snapshot of the input buffer.
    pub fn input(&self) -> String {
        self.state.input()
    }

    /// Replace the input buffer, as typing does.
    pub fn set_input(&self, text: impl Into<String>) {
        self.state.set_input(text);
    }

    // ----- Read models -------------------------------------------------------

    /// Snapshot of the conversation log in insertion order.
    pub fn conversation(&self) -> Vec<ConversationEntry> {
        self.state.conversation()
    }

    /// The pending notification, if one has not yet expired.
    pub fn notification(&self) -> Option<Notification> {
        self.notifications.current()
    }

    /// Dismiss the pending notification early.
    pub fn dismiss_notification(&self) {
        self.notifications.dismiss();
    }

    /// Whether a send or upload is in flight.
    pub fn busy(&self) -> bool {
        self.state.busy()
    }

    /// Upload progress, 0 to 100.
    pub fn upload_progress(&self) -> u8 {
        self.state.progress().current()
    }

    /// Subscribe to upload progress changes.
    pub fn subscribe_progress(&self) -> tokio::sync::watch::Receiver<u8> {
        self.state.progress().subscribe()
    }

    /// Whether a send would do anything right now.
    pub fn can_send(&self) -> bool {
        !self.state.busy() && !self.state.input().trim().is_empty()
    }

    /// Whether an upload would be admitted past the busy gate.
    pub fn can_upload(&self) -> bool {
        !self.state.busy()
    }

    /// Whether speech recognition is available in this environment.
    pub fn speech_supported(&self) -> bool {
        self.speech.is_supported()
    }

    /// Whether continuous recognition is running.
    pub fn listening(&self) -> bool {
        self.speech.listening()
    }

    // ----- Operations --------------------------------------------------------

    /// Send the current input buffer to the responder service.
    pub async fn send_message(&self) -> DispatchOutcome {
        self.dispatch.send_message().await
    }

    /// Upload an audio clip for transcription into the input buffer.
    pub async fn upload_audio(&self, source: AudioSource) -> UploadOutcome {
        self.upload.upload(source).await
    }

    /// Toggle continuous speech recognition.
    ///
    /// Stop is always honored while listening. Start is refused while a send
    /// or upload is in flight, and clears the previous transcript so the
    /// buffer only ever mirrors the new utterance.
    pub fn toggle_listening(&self) -> ToggleOutcome {
        if !self.speech.is_supported() {
            tracing::debug!("Speech toggle ignored: recognition unsupported");
            return ToggleOutcome::Ignored;
        }

        if self.speech.listening() {
            return match self.speech.stop() {
                Ok(()) => {
                    self.notifications.raise(STOPPED_PROMPT, Severity::Info);
                    ToggleOutcome::Stopped
                }
                // Lost a race with another stop; already idle.
                Err(_) => ToggleOutcome::Ignored,
            };
        }

        if self.state.busy() {
            tracing::debug!("Speech toggle ignored: operation in flight");
            return ToggleOutcome::Ignored;
        }

        self.speech.reset();
        match self.speech.start() {
            Ok(()) => {
                self.notifications.raise(LISTENING_PROMPT, Severity::Info);
                ToggleOutcome::Started
            }
            Err(e) => {
                tracing::warn!(error = %e, "Speech recognition failed to start");
                self.notifications.raise(e.to_string(), Severity::Error);
                ToggleOutcome::Ignored
            }
        }
    }

    /// Mirror the live speech transcript into the input buffer.
    ///
    /// Runs until the speech adapter is dropped. Spawn this once alongside
    /// the controller; each transcript revision overwrites the buffer, and
    /// an empty revision (a `reset`) leaves the buffer alone.
    pub async fn mirror_transcript(&self) {
        let mut rx = self.speech.subscribe();
        while rx.changed().await.is_ok() {
            let transcript = rx.borrow_and_update().clone();
            if !transcript.is_empty() {
                self.state.set_input(transcript);
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
