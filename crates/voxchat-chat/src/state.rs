//! Shared session state: input buffer, conversation log, busy gate.
//!
//! The buffer and log are owned here and mutated only through the dispatch,
//! upload, and controller operations. The busy flag serializes the two
//! network-triggering operations; acquiring it hands back a guard whose drop
//! restores the idle state on every path, success or failure.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use voxchat_client::progress::ProgressSender;
use voxchat_core::types::ConversationEntry;

/// State shared by every input channel of one chat session.
pub struct SessionState {
    input: Mutex<String>,
    log: Mutex<Vec<ConversationEntry>>,
    busy: AtomicBool,
    progress: ProgressSender,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            input: Mutex::new(String::new()),
            log: Mutex::new(Vec::new()),
            busy: AtomicBool::new(false),
            progress: ProgressSender::new(),
        }
    }

    /// Snapshot of the input buffer.
    pub fn input(&self) -> String {
        self.input.lock().expect("input mutex poisoned").clone()
    }

    /// Replace the input buffer (last writer wins).
    pub fn set_input(&self, text: impl Into<String>) {
        let mut guard = self.input.lock().expect("input mutex poisoned");
        *guard = text.into();
    }

    /// Clear the input buffer.
    pub fn clear_input(&self) {
        self.set_input(String::new());
    }

    /// Append an entry to the conversation log. Entries are immutable once
    /// appended and are never removed.
    pub fn push_entry(&self, entry: ConversationEntry) {
        let mut guard = self.log.lock().expect("log mutex poisoned");
        guard.push(entry);
    }

    /// Snapshot of the conversation log in insertion order.
    pub fn conversation(&self) -> Vec<ConversationEntry> {
        self.log.lock().expect("log mutex poisoned").clone()
    }

    /// Number of entries in the conversation log.
    pub fn conversation_len(&self) -> usize {
        self.log.lock().expect("log mutex poisoned").len()
    }

    /// Whether a network-triggering operation is in flight.
    pub fn busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Upload progress channel for this session.
    pub fn progress(&self) -> &ProgressSender {
        &self.progress
    }

    /// Try to claim the busy gate for one network-triggering operation.
    ///
    /// Returns `None` if another operation is already in flight; the caller
    /// treats that as a no-op, never as an error. The returned guard resets
    /// busy and upload progress when dropped.
    pub fn try_begin_operation(self: &Arc<Self>) -> Option<BusyGuard> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            Some(BusyGuard {
                state: Arc::clone(self),
            })
        } else {
            None
        }
    }
}

/// Holds the busy gate for the duration of one operation.
///
/// Dropping the guard is the `finally` of every send/upload: busy returns to
/// false and upload progress to 0 regardless of how the operation ended.
pub struct BusyGuard {
    state: Arc<SessionState>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.state.progress.reset();
        self.state.busy.store(false, Ordering::Release);
    }
}

// =============================================================================
// Tests
// =============================================================================
