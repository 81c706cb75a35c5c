//! Live speech input for VoxChat.
//!
//! Wraps a continuous speech-to-text capability behind the
//! [`SpeechRecognizer`] trait and exposes start/stop plus a live transcript
//! through [`SpeechInput`]. The transcript is the running recognized
//! utterance, not a delta; consumers mirror it wholesale.

pub mod adapter;
pub mod error;
pub mod recognizer;

pub use adapter::SpeechInput;
pub use error::SpeechError;
pub use recognizer::{SpeechRecognizer, SystemRecognizer, TranscriptSink};
