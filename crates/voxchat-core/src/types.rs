use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

// =============================================================================
// Conversation
// =============================================================================

/// Who produced a conversation entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Text the user sent.
    User,
    /// A reply from the responder service (including synthetic transcription
    /// entries from the upload pipeline).
    Assistant,
    /// A failed operation, shown in conversational context.
    Error,
}

/// One immutable entry in the conversation log.
///
/// The log is append-only and rendered in insertion order; entries are never
/// mutated or removed once appended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub text: String,
    pub sender: Role,
}

impl ConversationEntry {
    /// Create an entry for the given sender.
    pub fn new(text: impl Into<String>, sender: Role) -> Self {
        Self {
            text: text.into(),
            sender,
        }
    }

    /// Shorthand for a user entry.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, Role::User)
    }

    /// Shorthand for an assistant entry.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(text, Role::Assistant)
    }

    /// Shorthand for an error entry.
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, Role::Error)
    }
}

// =============================================================================
// Notifications
// =============================================================================

/// Severity of a user-facing status message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// A single user-facing status message.
///
/// At most one notification is pending at a time; a new one replaces the
/// previous one rather than queueing behind it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }
}

// =============================================================================
// Audio uploads
// =============================================================================

/// A user-selected audio clip staged for transcription.
///
/// Consumed by value when uploaded, so a retry always constructs a fresh
/// source (the equivalent of resetting a file picker).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioSource {
    /// Original file name, sent as the multipart file name.
    pub name: String,
    /// MIME type, validated by the upload pipeline before any network use.
    pub mime_type: String,
    /// Raw file contents.
    pub data: Vec<u8>,
}

impl AudioSource {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Read an audio file from disk, inferring the MIME type from its
    /// extension.
    ///
    /// Unknown extensions produce `application/octet-stream`, which the
    /// upload pipeline will reject during validation.
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());
        let mime_type = mime_for_extension(
            path.extension()
                .map(|e| e.to_string_lossy().to_ascii_lowercase())
                .unwrap_or_default()
                .as_str(),
        );
        Ok(Self {
            name,
            mime_type: mime_type.to_string(),
            data,
        })
    }

    /// Size of the clip in bytes.
    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Map a file extension to the MIME type the transcription service expects.
///
/// Mirrors the accepted upload set: `.wav .mp3 .ogg .m4a` (plus `.mp4`
/// audio containers).
fn mime_for_extension(ext: &str) -> &'static str {
    match ext {
        "wav" => "audio/wav",
        "mp3" => "audio/mpeg",
        "ogg" => "audio/ogg",
        "mp4" => "audio/mp4",
        "m4a" => "audio/x-m4a",
        _ => "application/octet-stream",
    }
}

// =============================================================================
// Tests
// =============================================================================
