//! Client for the responder service.
//!
//! One message per round-trip: `POST {base_url}/api/chat` with the raw user
//! text JSON-encoded as the request body, cookies included.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::ClientError;

/// Request path on the responder host.
const CHAT_PATH: &str = "/api/chat";

/// A service that turns one user message into one reply.
#[async_trait]
pub trait ResponderService: Send + Sync {
    /// Send `message` and return the reply text.
    async fn send_message(&self, message: &str) -> Result<String, ClientError>;
}

/// Reply shape of the responder service.
///
/// `response` is the canonical field; `message` is kept as a compatibility
/// shim for older server builds that used it instead.
#[derive(Debug, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ChatReply {
    /// The reply text, preferring the canonical field.
    ///
    /// Empty strings count as absent.
    pub fn reply_text(self) -> Option<String> {
        self.response
            .filter(|s| !s.is_empty())
            .or(self.message.filter(|s| !s.is_empty()))
    }
}

/// Optional JSON body attached to an error status.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// The server's explanation for the failure: `message` wins over the
    /// generic `error` string.
    pub fn user_message(self) -> Option<String> {
        self.message
            .filter(|s| !s.is_empty())
            .or(self.error.filter(|s| !s.is_empty()))
    }
}

/// HTTP implementation of [`ResponderService`] over `reqwest`.
pub struct ResponderClient {
    http: reqwest::Client,
    base_url: String,
}

impl ResponderClient {
    /// Build a client for the given base URL.
    ///
    /// The client carries a cookie store so the server session established
    /// at login travels with every request.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), CHAT_PATH)
    }
}

#[async_trait]
impl ResponderService for ResponderClient {
    async fn send_message(&self, message: &str) -> Result<String, ClientError> {
        let response = self
            .http
            .post(self.endpoint())
            .json(&message)
            .send()
            .await
            .map_err(ClientError::from_request)?;

        let status = response.status();
        if status.is_success() {
            let reply: ChatReply = response
                .json()
                .await
                .map_err(|e| ClientError::Content(format!("Malformed reply: {}", e)))?;
            let text = reply
                .reply_text()
                .ok_or_else(|| ClientError::Content("Reply missing response text".to_string()))?;
            tracing::debug!(reply_len = text.len(), "Responder reply received");
            Ok(text)
        } else {
            let code = status.as_u16();
            let body: ErrorBody = response.json().await.unwrap_or_default();
            tracing::warn!(status = code, "Responder request failed");
            match body.user_message() {
                Some(message) => Err(ClientError::Server {
                    status: code,
                    message,
                }),
                None => Err(ClientError::Status(code)),
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
