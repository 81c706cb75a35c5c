//! Shared types, errors, and configuration for VoxChat.
//!
//! VoxChat is a conversational client: typed text, live speech, and uploaded
//! audio all feed a single input buffer, and one message at a time is
//! exchanged with the responder service.

pub mod config;
pub mod error;
pub mod types;

pub use config::VoxConfig;
pub use error::{Result, VoxError};
pub use types::{AudioSource, ConversationEntry, Notification, Role, Severity};
