//! Message dispatch: one network round-trip per user message.
//!
//! Owns the send operation over the shared session state: append the user
//! entry, clear the buffer, issue exactly one request, and append either the
//! reply or an error entry. The busy gate rejects (never queues) a second
//! send while one is outstanding.

use std::sync::Arc;

use voxchat_client::error::ClientError;
use voxchat_client::responder::ResponderService;
use voxchat_core::types::{ConversationEntry, Severity};

use crate::notify::NotificationSlot;
use crate::state::SessionState;

/// Shown when a send fails without a server-supplied explanation.
pub const SEND_ERROR_FALLBACK: &str = "Error getting response";

/// What became of one `send_message` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The reply was appended to the log.
    Sent,
    /// The request failed; an error entry and notification were produced.
    Failed,
    /// Idempotent no-op: empty buffer or an operation already in flight.
    Ignored,
}

/// Sends the current input buffer to the responder service.
#[derive(Clone)]
pub struct MessageDispatch {
    state: Arc<SessionState>,
    notifications: Arc<NotificationSlot>,
    responder: Arc<dyn ResponderService>,
}

impl MessageDispatch {
    pub fn new(
        state: Arc<SessionState>,
        notifications: Arc<NotificationSlot>,
        responder: Arc<dyn ResponderService>,
    ) -> Self {
        Self {
            state,
            notifications,
            responder,
        }
    }

    /// Send the current buffer as one message.
    ///
    /// No-op when the buffer is empty or whitespace-only, or when another
    /// send/upload is in flight. On success the log gains a user entry and
    /// an assistant entry; on failure it gains a user entry and an error
    /// entry plus an `error` notification. Busy always returns to idle.
    pub async fn send_message(&self) -> DispatchOutcome {
        let buffer = self.state.input();
        let outgoing = buffer.trim().to_string();
        if outgoing.is_empty() {
            tracing::debug!("Send ignored: input buffer empty");
            return DispatchOutcome::Ignored;
        }

        let Some(_guard) = self.state.try_begin_operation() else {
            tracing::debug!("Send ignored: operation already in flight");
            return DispatchOutcome::Ignored;
        };

        self.state.push_entry(ConversationEntry::user(buffer));
        self.state.clear_input();

        match self.responder.send_message(&outgoing).await {
            Ok(reply) => {
                tracing::info!(sent_len = outgoing.len(), reply_len = reply.len(), "Message exchanged");
                self.state.push_entry(ConversationEntry::assistant(reply));
                DispatchOutcome::Sent
            }
            Err(e) => {
                tracing::warn!(error = %e, "Send failed");
                let text = match &e {
                    ClientError::Server { message, .. } if !message.is_empty() => message.clone(),
                    _ => SEND_ERROR_FALLBACK.to_string(),
                };
                self.state.push_entry(ConversationEntry::error(text.clone()));
                self.notifications.raise(text, Severity::Error);
                DispatchOutcome::Failed
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use voxchat_core::types::Role;

    use super::*;

    /// Scripted responder that replays queued results and counts calls.
    struct MockResponder {
        replies: Mutex<VecDeque<Result<String, ClientError>>>,
        calls: AtomicUsize,
    }

    impl MockResponder {
        fn with(replies: Vec<Result<String, ClientError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ResponderService for MockResponder {
        async fn send_message(&self, _message: &str) -> Result<String, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok("default reply".to_string()))
        }
    }

    fn fixture(
        replies: Vec<Result<String, ClientError>>,
    ) -> (MessageDispatch, Arc<SessionState>, Arc<NotificationSlot>, Arc<MockResponder>) {
        let state = Arc::new(SessionState::new());
        let notifications = Arc::new(NotificationSlot::new(Duration::from_secs(6)));
        let responder = MockResponder::with(replies);
        let dispatch = MessageDispatch::new(
            Arc::clone(&state),
            Arc::clone(&notifications),
            Arc::clone(&responder) as Arc<dyn ResponderService>,
        );
        (dispatch, state, notifications, responder)
    }

    #[tokio::test]
    async fn test_successful_send_appends_pair() {
        let (dispatch, state, _, _) = fixture(vec![Ok("hi there".to_string())]);
        state.set_input("hello");

        let outcome = dispatch.send_message().await;
        assert_eq!(outcome, DispatchOutcome::Sent);

        let log = state.conversation();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0], ConversationEntry::user("hello"));
        assert_eq!(log[1], ConversationEntry::assistant("hi there"));
        assert!(state.input().is_empty());
        assert!(!state.busy());
    }

    #[tokio::test]
    async fn test_sequence_of_sends_doubles_log() {
        let (dispatch, state, _, _) = fixture(vec![
            Ok("one".to_string()),
            Ok("two".to_string()),
            Ok("three".to_string()),
        ]);

        for msg in ["a", "b", "c"] {
            state.set_input(msg);
            assert_eq!(dispatch.send_message().await, DispatchOutcome::Sent);
        }

        let log = state.conversation();
        assert_eq!(log.len(), 6);
        // Strict completion order: user/assistant pairs.
        assert_eq!(log[0].text, "a");
        assert_eq!(log[1].text, "one");
        assert_eq!(log[4].text, "c");
        assert_eq!(log[5].text, "three");
    }

    #[tokio::test]
    async fn test_empty_buffer_is_noop() {
        let (dispatch, state, _, responder) = fixture(vec![]);
        assert_eq!(dispatch.send_message().await, DispatchOutcome::Ignored);

        state.set_input("   \t  ");
        assert_eq!(dispatch.send_message().await, DispatchOutcome::Ignored);

        assert!(state.conversation().is_empty());
        assert_eq!(responder.calls(), 0);
        // The whitespace buffer is left alone by the no-op.
        assert_eq!(state.input(), "   \t  ");
    }

    #[tokio::test]
    async fn test_busy_send_is_noop() {
        let (dispatch, state, _, responder) = fixture(vec![]);
        state.set_input("queued message");

        let _guard = state.try_begin_operation().unwrap();
        assert_eq!(dispatch.send_message().await, DispatchOutcome::Ignored);
        assert!(state.conversation().is_empty());
        assert_eq!(responder.calls(), 0);
        // The buffer is untouched so the user can retry.
        assert_eq!(state.input(), "queued message");
    }

    #[tokio::test]
    async fn test_failed_send_uses_server_message() {
        let (dispatch, state, notifications, _) = fixture(vec![Err(ClientError::Server {
            status: 500,
            message: "server down".to_string(),
        })]);
        state.set_input("hello?");

        let outcome = dispatch.send_message().await;
        assert_eq!(outcome, DispatchOutcome::Failed);

        let log = state.conversation();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].sender, Role::User);
        assert_eq!(log[1], ConversationEntry::error("server down"));

        let n = notifications.current().unwrap();
        assert_eq!(n.message, "server down");
        assert_eq!(n.severity, Severity::Error);
        assert!(!state.busy());
    }

    #[tokio::test]
    async fn test_failed_send_without_server_message_uses_fallback() {
        let (dispatch, state, notifications, _) =
            fixture(vec![Err(ClientError::Network("connection reset".to_string()))]);
        state.set_input("hello?");

        dispatch.send_message().await;
        let log = state.conversation();
        assert_eq!(log[1], ConversationEntry::error(SEND_ERROR_FALLBACK));
        assert_eq!(notifications.current().unwrap().message, SEND_ERROR_FALLBACK);
    }

    #[tokio::test]
    async fn test_failed_send_empty_server_message_uses_fallback() {
        let (dispatch, state, _, _) = fixture(vec![Err(ClientError::Server {
            status: 500,
            message: String::new(),
        })]);
        state.set_input("hello?");

        dispatch.send_message().await;
        assert_eq!(
            state.conversation()[1],
            ConversationEntry::error(SEND_ERROR_FALLBACK)
        );
    }

    #[tokio::test]
    async fn test_failed_send_status_only_uses_fallback() {
        let (dispatch, state, _, _) = fixture(vec![Err(ClientError::Status(502))]);
        state.set_input("hello?");

        dispatch.send_message().await;
        assert_eq!(
            state.conversation()[1],
            ConversationEntry::error(SEND_ERROR_FALLBACK)
        );
        assert!(!state.busy());
    }

    #[tokio::test]
    async fn test_send_body_is_trimmed_but_log_keeps_buffer() {
        struct CapturingResponder {
            seen: Mutex<Vec<String>>,
        }

        #[async_trait]
        impl ResponderService for CapturingResponder {
            async fn send_message(&self, message: &str) -> Result<String, ClientError> {
                self.seen.lock().unwrap().push(message.to_string());
                Ok("ok".to_string())
            }
        }

        let state = Arc::new(SessionState::new());
        let notifications = Arc::new(NotificationSlot::new(Duration::from_secs(6)));
        let responder = Arc::new(CapturingResponder {
            seen: Mutex::new(Vec::new()),
        });
        let dispatch = MessageDispatch::new(
            Arc::clone(&state),
            notifications,
            Arc::clone(&responder) as Arc<dyn ResponderService>,
        );

        state.set_input("  hello world  ");
        dispatch.send_message().await;

        assert_eq!(responder.seen.lock().unwrap()[0], "hello world");
        assert_eq!(state.conversation()[0].text, "  hello world  ");
    }

    #[tokio::test]
    async fn test_send_after_failure_recovers() {
        let (dispatch, state, _, _) = fixture(vec![
            Err(ClientError::Timeout),
            Ok("back online".to_string()),
        ]);

        state.set_input("first");
        assert_eq!(dispatch.send_message().await, DispatchOutcome::Failed);
        assert!(!state.busy());

        state.set_input("second");
        assert_eq!(dispatch.send_message().await, DispatchOutcome::Sent);
        assert_eq!(state.conversation().len(), 4);
    }
}
