//! Upload progress as a structured channel.
//!
//! Progress is a stream of percentage updates followed by a terminal
//! result from the upload itself, rather than an ad hoc mutable counter.
//! The sender enforces the lifecycle invariants: values are monotone
//! non-decreasing within one upload and always bounded in `[0, 100]`.

use std::sync::Arc;

use tokio::sync::watch;

/// Shared writer for upload progress percentages.
///
/// Clones share one underlying channel; `subscribe` hands out receivers for
/// anything that wants to render the current percentage.
#[derive(Clone, Debug)]
pub struct ProgressSender {
    tx: Arc<watch::Sender<u8>>,
}

impl Default for ProgressSender {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSender {
    /// Create a new progress channel starting at 0.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0u8);
        Self { tx: Arc::new(tx) }
    }

    /// Record that `sent` of `total` bytes have been transmitted.
    ///
    /// The percentage is `round(sent * 100 / total)`, clamped to 100.
    /// Updates that would move the value backwards are ignored, so
    /// out-of-order reports cannot make the indicator jitter.
    pub fn report(&self, sent: u64, total: u64) {
        if total == 0 {
            return;
        }
        let pct = ((sent as f64 * 100.0 / total as f64).round() as u64).min(100) as u8;
        self.tx.send_if_modified(|current| {
            if pct > *current {
                *current = pct;
                true
            } else {
                false
            }
        });
    }

    /// Reset to 0 for the next upload lifecycle.
    pub fn reset(&self) {
        self.tx.send_replace(0);
    }

    /// Current percentage.
    pub fn current(&self) -> u8 {
        *self.tx.borrow()
    }

    /// Subscribe to progress updates.
    pub fn subscribe(&self) -> watch::Receiver<u8> {
        self.tx.subscribe()
    }
}

// =============================================================================
// Tests
// =============================================================================
