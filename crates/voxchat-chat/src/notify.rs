//! Single-slot notification channel.
//!
//! Holds at most one pending user-facing status message. A new notification
//! replaces the previous one rather than queueing behind it, and a pending
//! one auto-dismisses after a fixed interval. Expiry is checked on read, so
//! no background timer task is needed.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use voxchat_core::types::{Notification, Severity};

/// The one pending notification, if any, with its raise time.
pub struct NotificationSlot {
    current: Mutex<Option<(Notification, Instant)>>,
    ttl: Duration,
}

impl NotificationSlot {
    /// Create a slot whose notifications auto-dismiss after `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            current: Mutex::new(None),
            ttl,
        }
    }

    /// Raise a notification, replacing any pending one.
    pub fn raise(&self, message: impl Into<String>, severity: Severity) {
        let notification = Notification::new(message, severity);
        tracing::debug!(
            severity = ?notification.severity,
            message = %notification.message,
            "Notification raised"
        );
        let mut guard = self.current.lock().expect("notification mutex poisoned");
        *guard = Some((notification, Instant::now()));
    }

    /// The pending notification, or `None` once it has expired or been
    /// dismissed.
    pub fn current(&self) -> Option<Notification> {
        let mut guard = self.current.lock().expect("notification mutex poisoned");
        match &*guard {
            Some((_, raised_at)) if raised_at.elapsed() >= self.ttl => {
                *guard = None;
                None
            }
            Some((notification, _)) => Some(notification.clone()),
            None => None,
        }
    }

    /// Dismiss the pending notification early.
    pub fn dismiss(&self) {
        let mut guard = self.current.lock().expect("notification mutex poisoned");
        *guard = None;
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn slot() -> NotificationSlot {
        NotificationSlot::new(Duration::from_secs(6))
    }

    #[test]
    fn test_empty_slot() {
        assert!(slot().current().is_none());
    }

    #[test]
    fn test_raise_and_read() {
        let slot = slot();
        slot.raise("Audio successfully transcribed", Severity::Success);

        let n = slot.current().unwrap();
        assert_eq!(n.message, "Audio successfully transcribed");
        assert_eq!(n.severity, Severity::Success);
    }

    #[test]
    fn test_new_notification_replaces_previous() {
        let slot = slot();
        slot.raise("first", Severity::Info);
        slot.raise("second", Severity::Error);

        let n = slot.current().unwrap();
        assert_eq!(n.message, "second");
        assert_eq!(n.severity, Severity::Error);
    }

    #[test]
    fn test_dismiss_clears() {
        let slot = slot();
        slot.raise("pending", Severity::Info);
        slot.dismiss();
        assert!(slot.current().is_none());
    }

    #[test]
    fn test_auto_dismiss_after_ttl() {
        let slot = NotificationSlot::new(Duration::from_millis(5));
        slot.raise("short lived", Severity::Info);
        assert!(slot.current().is_some());

        std::thread::sleep(Duration::from_millis(10));
        assert!(slot.current().is_none());
        // Stays cleared on subsequent reads.
        assert!(slot.current().is_none());
    }

    #[test]
    fn test_raise_restarts_the_clock() {
        let slot = NotificationSlot::new(Duration::from_millis(30));
        slot.raise("first", Severity::Info);
        std::thread::sleep(Duration::from_millis(20));

        slot.raise("second", Severity::Info);
        std::thread::sleep(Duration::from_millis(20));
        // 40ms after the first raise but only 20ms after the second.
        assert_eq!(slot.current().unwrap().message, "second");
    }
}
