//! HTTP transport for VoxChat.
//!
//! Wraps the two consumed services behind async traits so the chat layer can
//! be exercised against mocks:
//! - the responder service (`POST /api/chat`)
//! - the transcription service (`POST /api/transcribe`, multipart upload
//!   with live progress reporting)

pub mod error;
pub mod progress;
pub mod responder;
pub mod transcribe;

pub use error::ClientError;
pub use progress::ProgressSender;
pub use responder::{ResponderClient, ResponderService};
pub use transcribe::{TranscriptionClient, TranscriptionService, NO_TRANSCRIPTION};
