//! The chat interaction layer for VoxChat.
//!
//! Unifies three concurrent input channels (typed text, live speech,
//! uploaded audio) into a single outgoing message stream: one shared input
//! buffer, one append-only conversation log, one busy gate serializing the
//! network-triggering operations, and one notification slot for every
//! user-facing status message.

pub mod controller;
pub mod dispatch;
pub mod error;
pub mod notify;
pub mod state;
pub mod upload;

pub use controller::{
    ChatController, ToggleOutcome, GREETING, LISTENING_PROMPT, STOPPED_PROMPT,
};
pub use dispatch::{DispatchOutcome, MessageDispatch, SEND_ERROR_FALLBACK};
pub use error::ChatError;
pub use notify::NotificationSlot;
pub use state::{BusyGuard, SessionState};
pub use upload::{
    AudioUploadPipeline, UploadOutcome, ACCEPTED_MIME_TYPES, TRANSCRIBED_NOTICE,
    UNSUPPORTED_FORMAT, UPLOAD_ERROR_FALLBACK,
};
